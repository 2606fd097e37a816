//! Domain Layer - Core business logic for the webhook relay
//!
//! Pure types and rules with no I/O. All exchange interaction happens
//! through the ports layer.
//!
//! - `signal`: webhook payload -> `TradeSignal`
//! - `order`: market order parameters and their canonical query form
//! - `quantity`: USDT order size -> asset quantity
//! - `position_gate`: bounded counter of open longs

pub mod signal;
pub mod order;
pub mod quantity;
pub mod position_gate;

pub use signal::{TradeSignal, SignalAction, SignalError};
pub use order::{OrderRequest, OrderSide, PositionSide, OrderType, DEFAULT_RECV_WINDOW_MS};
pub use quantity::{calculate_quantity, QuantityError, DEFAULT_QUANTITY_PRECISION};
pub use position_gate::{PositionGate, LongReservation, GateSnapshot, DEFAULT_MAX_OPEN_LONGS};
