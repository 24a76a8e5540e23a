//! Rendering-free model of the list screens: filter/pagination state,
//! search debouncing, the pager window and the tag editor widget.

pub mod debounce;
pub mod state;
pub mod tag_editor;
pub mod window;
