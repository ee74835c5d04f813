//! Trait abstraction over a weather station.
//!
//! [`WeatherStation`] is implemented by the HTTP client for a real station
//! and by [`MockStation`](crate::MockStation) for tests.

use async_trait::async_trait;

use weatherdash_types::{CurrentSample, HistoryEntry};

use crate::error::Result;

/// Operations every weather-station backend supports.
///
/// # Example
///
/// ```
/// use weatherdash_core::{MockStation, WeatherStation, Result};
///
/// async fn print_current<S: WeatherStation + ?Sized>(station: &S) -> Result<()> {
///     let sample = station.current().await?;
///     println!("{:.1} °C", sample.temp);
///     Ok(())
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let station = MockStation::new();
///     print_current(&station).await.unwrap();
/// }
/// ```
#[async_trait]
pub trait WeatherStation: Send + Sync {
    /// Where this station lives (a base URL, or a label for mocks).
    fn endpoint(&self) -> &str;

    /// Latest sample.
    async fn current(&self) -> Result<CurrentSample>;

    /// Recorded history, oldest first.
    async fn history(&self) -> Result<Vec<HistoryEntry>>;

    /// Whether the station currently answers.
    ///
    /// The default implementation asks for the current sample.
    async fn is_reachable(&self) -> bool {
        self.current().await.is_ok()
    }
}
