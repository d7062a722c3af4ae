//! TraCI: the simulator's TCP remote-control protocol.
//!
//! Only the handful of commands the pipeline needs are implemented.  All
//! integers and doubles are big-endian.
//!
//! ```text
//! message  := i32 total_length  command*
//! command  := u8 len  u8 id  payload              (len <= 255)
//!           | u8 0  i32 len  u8 id  payload       (extended)
//! response := status  [result]  per command
//! status   := command(id, u8 result, string description)
//! result   := command(id + 0x10, u8 var, string object, u8 type, value)
//! ```

pub(crate) mod client;
pub(crate) mod codec;

pub use client::TraciEngine;

// ── Command identifiers ───────────────────────────────────────────────────────

pub(crate) const CMD_GETVERSION: u8 = 0x00;
pub(crate) const CMD_SIMSTEP: u8 = 0x02;
pub(crate) const CMD_CLOSE: u8 = 0x7f;
pub(crate) const CMD_GET_LANE_VARIABLE: u8 = 0xa3;
pub(crate) const CMD_GET_VEHICLE_VARIABLE: u8 = 0xa4;
pub(crate) const CMD_GET_SIM_VARIABLE: u8 = 0xab;

/// Get-command responses echo the command id plus this offset.
pub(crate) const RESPONSE_OFFSET: u8 = 0x10;

// ── Variable identifiers ──────────────────────────────────────────────────────

pub(crate) const ID_LIST: u8 = 0x00;
pub(crate) const VAR_SPEED: u8 = 0x40;
pub(crate) const VAR_POSITION: u8 = 0x42;
pub(crate) const VAR_ROAD_ID: u8 = 0x50;
pub(crate) const VAR_LANE_ID: u8 = 0x51;
pub(crate) const VAR_TIME: u8 = 0x66;
pub(crate) const VAR_MIN_EXPECTED_VEHICLES: u8 = 0x7d;
pub(crate) const VAR_POSITION_CONVERSION: u8 = 0x82;

// ── Value types ───────────────────────────────────────────────────────────────

pub(crate) const POSITION_LON_LAT: u8 = 0x00;
pub(crate) const POSITION_2D: u8 = 0x01;
pub(crate) const TYPE_UBYTE: u8 = 0x07;
pub(crate) const TYPE_INTEGER: u8 = 0x09;
pub(crate) const TYPE_DOUBLE: u8 = 0x0b;
pub(crate) const TYPE_STRING: u8 = 0x0c;
pub(crate) const TYPE_STRINGLIST: u8 = 0x0e;
pub(crate) const TYPE_COMPOUND: u8 = 0x0f;

/// Status result code for success.
pub(crate) const RTYPE_OK: u8 = 0x00;
