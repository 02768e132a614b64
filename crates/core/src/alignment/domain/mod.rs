pub mod aligner;
pub mod diff;
pub mod edit_script;
