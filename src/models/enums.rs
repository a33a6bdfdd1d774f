//! Shared domain enums

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Borrow request lifecycle status.
///
/// `Rejected` and `Returned` are terminal; `PartiallyReturned` accepts
/// further returns until the outstanding quantity reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Returned,
    PartiallyReturned,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
            RequestStatus::Returned => "returned",
            RequestStatus::PartiallyReturned => "partially_returned",
        }
    }

    /// Whether stock is currently reserved under this request
    pub fn is_outstanding(&self) -> bool {
        matches!(self, RequestStatus::Approved | RequestStatus::PartiallyReturned)
    }

    /// Whether the request still awaits an approval decision
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "returned" => Ok(RequestStatus::Returned),
            "partially_returned" => Ok(RequestStatus::PartiallyReturned),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

// SQLx conversion: stored as text in the requests table
impl sqlx::Type<Postgres> for RequestStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RequestStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RequestStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

// ---------------------------------------------------------------------------
// StockStatus
// ---------------------------------------------------------------------------

/// Item availability, derived from `(in_stock, total)`. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    PartialInStock,
    OutOfStock,
}

impl StockStatus {
    pub fn derive(in_stock: i32, total: i32) -> Self {
        if in_stock == 0 {
            StockStatus::OutOfStock
        } else if in_stock < total {
            StockStatus::PartialInStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::PartialInStock => "partial_in_stock",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_derive() {
        assert_eq!(StockStatus::derive(0, 10), StockStatus::OutOfStock);
        assert_eq!(StockStatus::derive(3, 10), StockStatus::PartialInStock);
        assert_eq!(StockStatus::derive(10, 10), StockStatus::InStock);
        // an item with no units at all has nothing available
        assert_eq!(StockStatus::derive(0, 0), StockStatus::OutOfStock);
    }

    #[test]
    fn test_request_status_roundtrip() {
        for s in ["pending", "approved", "rejected", "returned", "partially_returned"] {
            let parsed: RequestStatus = s.parse().unwrap();
            assert_eq!(parsed.as_str(), s);
        }
        assert!("cancelled".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_outstanding_states() {
        assert!(RequestStatus::Approved.is_outstanding());
        assert!(RequestStatus::PartiallyReturned.is_outstanding());
        assert!(!RequestStatus::Pending.is_outstanding());
        assert!(!RequestStatus::Rejected.is_outstanding());
        assert!(!RequestStatus::Returned.is_outstanding());
    }
}
