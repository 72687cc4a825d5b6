// src/location/replay.rs
//! Replays a recorded route as if it came from a receiver

use super::{LocationCallback, LocationEvent, LocationOptions, LocationProvider, Subscription};
use crate::{error::Result, geo::Coordinate};
use std::{path::Path, sync::atomic::Ordering};
use tokio::time::{interval, MissedTickBehavior};

/// Emits every point of a route, one per `interval_ms`
#[derive(Debug, Clone)]
pub struct ReplayProvider {
    route: Vec<Coordinate>,
    name: String,
}

impl ReplayProvider {
    pub fn new(route: Vec<Coordinate>) -> Self {
        Self {
            route,
            name: "replay".to_string(),
        }
    }

    /// Load a JSON array of `{"latitude": .., "longitude": ..}` objects
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let route: Vec<Coordinate> = serde_json::from_str(&contents)?;
        Ok(Self {
            route,
            name: format!("replay {}", path.display()),
        })
    }

    pub fn len(&self) -> usize {
        self.route.len()
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_empty()
    }
}

impl LocationProvider for ReplayProvider {
    fn subscribe(&self, options: &LocationOptions, on_event: LocationCallback) -> Subscription {
        let route = self.route.clone();
        let period = options.interval();

        Subscription::spawn(move |running| async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for coord in route {
                ticker.tick().await;
                if !running.load(Ordering::Relaxed) {
                    break;
                }
                on_event(LocationEvent::Fix(coord));
            }
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("replay-test-{}.json", std::process::id()));
        std::fs::write(&path, r#"[{"latitude":1.0,"longitude":2.0},{"latitude":1.5,"longitude":2.5}]"#).unwrap();

        let provider = ReplayProvider::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(provider.len(), 2);
        assert!(provider.name().starts_with("replay "));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(ReplayProvider::from_file(Path::new("/nonexistent/route.json")).is_err());
    }

    #[tokio::test]
    async fn test_replays_every_point_in_order() {
        let route = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 0.001),
            Coordinate::new(0.0, 0.002),
        ];
        let provider = ReplayProvider::new(route.clone());
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);

        let options = LocationOptions {
            interval_ms: 1,
            ..LocationOptions::default()
        };
        let subscription = provider.subscribe(
            &options,
            Arc::new(move |event| {
                if let LocationEvent::Fix(coord) = event {
                    sink.lock().unwrap().push(coord);
                }
            }),
        );

        for _ in 0..200 {
            if received.lock().unwrap().len() == route.len() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        subscription.unsubscribe();
        assert_eq!(*received.lock().unwrap(), route);
    }
}
