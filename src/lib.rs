// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # banwatch
//!
//! A terminal dashboard and library for monitoring system metrics and
//! blocked-IP (Fail2Ban) activity served by a monitoring backend.
//!
//! The crate polls two JSON endpoints on a fixed interval, transforms each
//! snapshot into chart-ready series, and keeps three live charts in sync
//! with the latest data: CPU/RAM usage, network traffic, and blocked
//! addresses per minute. Charts are constructed once and mutated in place
//! on every later cycle; the per-bucket detail of the bans chart can be
//! inspected in a tooltip-style popup.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│  chart   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │(reconcile)    │(render) │    │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │              ▲                                       │
//! │       ▼              │                                       │
//! │  ┌─────────┐    ┌────┴─────┐                                 │
//! │  │ source  │───▶│   data   │  HttpSource | FileSource |      │
//! │  │ (fetch) │    │(transform)  ChannelSource                  │
//! │  └─────────┘    └──────────┘                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: snapshot retrieval — wire types, shape validation, the
//!   [`UpdateSource`] trait, HTTP polling with the refresh scheduler, file
//!   replay, and channel-based input
//! - **[`data`]**: transformation of raw snapshots into index-aligned,
//!   chart-ready updates and the per-bucket [`DetailIndex`]
//! - **[`chart`]**: the chart registry — one long-lived handle per logical
//!   chart, initialized once and mutated in place per cycle
//! - **[`tooltip`]**: reconstruction of the raw addresses behind an
//!   aggregated bans data point
//! - **[`app`]**: application state, cycle application with the per-flow
//!   staleness guard, and user interaction logic
//! - **[`ui`]**: terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll a backend every 30 seconds
//! banwatch --url http://server:5000
//!
//! # Replay captured payloads without a backend
//! banwatch --metrics-file history.json --bans-file bans.json
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use banwatch::{App, ChannelSource};
//!
//! // Create a channel for pushing cycle results
//! let (tx, source) = ChannelSource::create("embedded");
//!
//! // Create the app
//! let app = App::new(Box::new(source));
//! ```

pub mod app;
pub mod chart;
pub mod data;
pub mod events;
pub mod source;
pub mod tooltip;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use chart::{ChartHandle, ChartId, ChartRegistry, TICK_LABEL_CAP};
pub use data::{BansUpdate, DetailIndex, MetricsUpdate};
pub use source::{
    BansSnapshot, ChannelSource, CycleEvent, FetchError, Fetcher, FileSource, HttpSource,
    MetricsSnapshot, ShapeError, UpdateSource,
};
pub use tooltip::{BanSeries, NO_BLOCKED_ADDRESSES};
