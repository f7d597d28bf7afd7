//! # Repository Module
//!
//! Database repositories for the pharmacy API.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Route handler                                                          │
//! │       │  db.records(&BRANCH).list()                                     │
//! │       ▼                                                                 │
//! │  EntityRepository  (one type for all ten entities)                     │
//! │  ├── list()             SELECT + joins, rows re-keyed                  │
//! │  └── write(statement)   INSERT / UPDATE / DELETE                       │
//! │       │                                                                 │
//! │  DashboardRepository                                                   │
//! │  └── stats()            ten aggregates, run concurrently               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  QueryExecutor ──► pool                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`EntityRepository`](entity::EntityRepository) - Catalogue-driven CRUD
//! - [`DashboardRepository`](dashboard::DashboardRepository) - Aggregate stats

pub mod dashboard;
pub mod entity;
