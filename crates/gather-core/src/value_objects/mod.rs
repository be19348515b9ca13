//! Value objects - immutable types that represent domain concepts

mod geo;
mod join_code;
mod role;
mod snowflake;

pub use geo::{GeoPoint, Location, TimeWindow};
pub use join_code::JoinCode;
pub use role::{EventRole, MemberRole};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
