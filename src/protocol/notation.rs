//! Text notation for coordinates, directions and orders.
//!
//! Coordinates are written `row,col` (`3,5`, `-1,7`), directions by their
//! compass label (`E SE SW W NW NE`) and order types in upper case
//! (`MOVE`, `BUILD_WALL`, ...). A full order is written
//! `<TYPE> <row,col> [<DIR>]`, e.g. `SPAWN 3,5 SW` or `FORAGE 2,4`.
//!
//! Coordinates serialize as notation strings so they can key JSON maps.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::board::{Coords, Direction, Order, OrderType};

/// Errors that can occur when parsing notation strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty input")]
    EmptyInput,

    #[error("invalid coordinates '{0}'")]
    InvalidCoords(String),

    #[error("unknown direction '{0}'")]
    UnknownDirection(String),

    #[error("unknown order type '{0}'")]
    UnknownOrderType(String),

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

impl FromStr for Coords {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidCoords(s.to_string());
        let (row, col) = s.trim().split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse().map_err(|_| invalid())?;
        let col = col.trim().parse().map_err(|_| invalid())?;
        Ok(Coords::new(row, col))
    }
}

impl FromStr for Direction {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_label(s.trim()).ok_or_else(|| NotationError::UnknownDirection(s.to_string()))
    }
}

impl FromStr for OrderType {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderType::from_label(s.trim()).ok_or_else(|| NotationError::UnknownOrderType(s.to_string()))
    }
}

/// Parses a single order such as `MOVE 3,5 SW`.
///
/// The direction may be omitted for FORAGE and BUILD_HIVE, which act in place.
pub fn parse_order(s: &str) -> Result<Order, NotationError> {
    let mut tokens = s.split_whitespace();
    let order_type: OrderType = tokens.next().ok_or(NotationError::EmptyInput)?.parse()?;
    let coords: Coords = tokens
        .next()
        .ok_or(NotationError::UnexpectedEnd("coordinates"))?
        .parse()?;
    let direction = match (tokens.next(), order_type) {
        (Some(dir), _) => dir.parse()?,
        (None, OrderType::Forage | OrderType::BuildHive) => Direction::E,
        (None, _) => return Err(NotationError::UnexpectedEnd("direction")),
    };
    if let Some(extra) = tokens.next() {
        return Err(NotationError::TrailingInput(extra.to_string()));
    }
    Ok(Order::new(order_type, coords, direction))
}

/// Parses one order per non-empty line.
pub fn parse_orders(s: &str) -> Result<Vec<Order>, NotationError> {
    s.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_order)
        .collect()
}

/// Formats an order in notation. In-place orders omit their direction.
pub fn format_order(order: &Order) -> String {
    match order.order_type {
        OrderType::Forage | OrderType::BuildHive => {
            format!("{} {}", order.order_type.label(), order.coords)
        }
        _ => format!(
            "{} {} {}",
            order.order_type.label(),
            order.coords,
            order.direction
        ),
    }
}

/// Formats orders one per line.
pub fn format_orders(orders: &[Order]) -> String {
    orders.iter().map(format_order).collect::<Vec<_>>().join("\n")
}

impl Serialize for Coords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Coords {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CoordsVisitor;

        impl Visitor<'_> for CoordsVisitor {
            type Value = Coords;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("coordinates written as \"row,col\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Coords, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(CoordsVisitor)
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}
