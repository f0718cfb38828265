pub mod column;
pub mod observation;
pub mod table;

pub use column::{NumericColumn, WeatherVariable};
pub use observation::{ObservationRecord, RawObservation};
pub use table::ObservationTable;
