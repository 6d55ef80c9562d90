/*
 * This module provides the application logic layer, centered around
 * `VocabAppLogic`, which acts as the Presenter/Controller for one session. It
 * also includes `ViewState` for presentation-only state (tab, theme, paging).
 * Unit tests for `VocabAppLogic` are in `handler_tests.rs`.
 */
pub mod handler;
pub mod ui_constants;
pub mod view_state;


pub use handler::VocabAppLogic;
pub use view_state::ViewState;
