//! # Repository Module
//!
//! One repository per aggregate, each holding a clone of the pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │  db.items().search("cand")                                     │
//! │       ▼                                                                 │
//! │  ItemRepository      list / search / get / insert / update / delete    │
//! │  SaleRepository      commit (one transaction) / recent / since         │
//! │  RequestRepository   list / insert / fulfil                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod item;
pub mod request;
pub mod sale;
