pub mod neighborhood_view;
pub mod page;
pub mod state;
