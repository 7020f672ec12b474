//! Shared fixtures for the viewer's tests.

use async_trait::async_trait;
use std::{sync::Arc, thread, time::Duration};
use tokio::runtime::Runtime;
use weather_core::{
    HistoryFetcher, HistoryProvider, HistoryQuery, ProviderId, WeatherError, WeatherTable,
    parse::parse_history_csv,
};

use crate::app::App;

pub const FIXTURE: &str = "\
Address,Date time,Minimum Temperature,Maximum Temperature,Temperature,Relative Humidity,Precipitation
\"Washington,DC,USA\",03/09/2024,42.1,58.3,50.2,64.12,0.38
\"Washington,DC,USA\",03/03/2024,38.2,55.1,46.9,60.5,0
\"Washington,DC,USA\",03/04/2024,40,61.8,51.4,63.33,0.02
\"Washington,DC,USA\",03/05/2024,45.6,66.2,55.9,71.8,0.51
\"Washington,DC,USA\",03/06/2024,47.3,63.4,54.7,82.41,1.12
\"Washington,DC,USA\",03/07/2024,41.5,57.7,49.8,68.02,0
\"Washington,DC,USA\",03/08/2024,39.9,60.1,50.1,61.9,0.05
";

pub fn fixture_table() -> WeatherTable {
    parse_history_csv("Washington,DC,USA", FIXTURE).expect("fixture parses")
}

/// Answers from the fixture. "Atlantis" fails with a 400, "Slow" never answers.
#[derive(Debug)]
pub struct FixtureProvider;

#[async_trait]
impl HistoryProvider for FixtureProvider {
    fn id(&self) -> ProviderId {
        ProviderId::RapidApi
    }

    async fn fetch_history_csv(&self, query: &HistoryQuery) -> Result<String, WeatherError> {
        match query.location.as_str() {
            "Atlantis" => Err(WeatherError::HttpStatus {
                status: 400,
                body: "Bad API Request:Invalid location parameter value.".into(),
            }),
            "Slow" => std::future::pending().await,
            _ => Ok(FIXTURE.to_string()),
        }
    }
}

pub fn runtime() -> Runtime {
    Runtime::new().expect("test runtime")
}

pub fn new_app(rt: &Runtime) -> App {
    let fetcher = HistoryFetcher::new(Box::new(FixtureProvider), None);
    App::new(Arc::new(fetcher), rt.handle().clone())
}

/// Poll until the pending search settles.
pub fn wait_for_fetch(app: &mut App) {
    for _ in 0..500 {
        app.poll_fetch();
        if !app.session.is_searching() {
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("fetch did not finish in time");
}

/// App with the fixture already loaded.
pub fn loaded_app(rt: &Runtime) -> App {
    let mut app = new_app(rt);
    app.search_for("Washington,DC,USA");
    wait_for_fetch(&mut app);
    assert!(app.session.navigation_enabled(), "fixture should load");
    app
}
