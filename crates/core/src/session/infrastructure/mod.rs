pub mod replay_provider;
