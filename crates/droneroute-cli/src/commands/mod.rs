// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments and dispatches
// to these handlers.

pub mod replay;
pub mod route;
pub mod suggest;

pub use replay::handle_replay_command;
pub use route::handle_route_command;
pub use suggest::handle_suggest_command;
