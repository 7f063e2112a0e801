mod alias;
mod config;
mod error;
mod filter;
mod operator;
mod params;
mod projection;
mod query;
mod shaper;
mod sort;

pub use alias::{Alias, TOP_TOURS};
pub use config::ShaperConfig;
pub use error::{ParamsError, ShapeError};
pub use filter::{Filter, Predicate};
pub use operator::Operator;
pub use params::{CONTROL_KEYS, ParamValue, ParameterMap, is_control_key};
pub use projection::Projection;
pub use query::{PageRequest, PageWindow, QueryDescriptor};
pub use shaper::{QueryShaper, ShapedQuery};
pub use sort::{Sort, SortDirection, parse_sort};
