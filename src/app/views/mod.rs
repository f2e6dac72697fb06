pub mod state_view;
