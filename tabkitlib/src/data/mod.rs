//! Data: typed values, records and the readers that build them.
//!
//! This module handles loading tabular text into memory. It provides:
//!
//! - **Values**: [`Value`], [`ColumnType`] converters and string interning
//! - **Containers**: [`Record`], the typed column store [`DataCollection`]
//!   and the ride-specific [`RideData`]
//! - **Readers**: generic CSV readers (`read_csv_as_*`) and the ride readers
//!   (`read_rides_as_*`)
//! - **Domain types**: [`Stock`], [`MutInt`], ride analytics and `portfolio_cost`
//!
//! ## Example
//!
//! ```rust
//! use tabkitlib::data::{columns_from_reader, ColumnType};
//!
//! let text = "name,shares\nAA,100\nIBM,50\n";
//! let coltypes = ColumnType::parse_list("str,int").unwrap();
//! let data = columns_from_reader(text.as_bytes(), &coltypes).unwrap();
//! assert_eq!(data.len(), 2);
//! assert_eq!(data.slice(1.., 1).unwrap().len(), 1);
//! ```

pub mod collection;
pub mod mutint;
pub mod pcost;
pub mod reader;
pub mod record;
pub mod ridership;
pub mod rides;
pub mod stock;
pub mod value;

pub use collection::{DataCollection, SliceSpec};
pub use mutint::{Dispatch, MutInt};
pub use pcost::{portfolio_cost, portfolio_cost_from_reader};
pub use reader::{
    columns_from_reader, read_csv_as_columns, read_csv_as_dicts, read_csv_as_instances,
    CsvParser, DictCsvParser, FromRow, InstanceCsvParser,
};
pub use record::Record;
pub use ridership::{count_passengers, count_route_rides, count_routes, top_increases, RideFields};
pub use rides::{
    read_rides_as_columns, read_rides_as_dicts, read_rides_as_ridedata, read_rides_as_structs,
    read_rides_as_tuples, Ride, RideColumns, RideData, RideTuple, RIDE_FIELDS,
};
pub use stock::{print_portfolio, read_portfolio, Stock};
pub use value::{ColumnType, Interner, Value};
