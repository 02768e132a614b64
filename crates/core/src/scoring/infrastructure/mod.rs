pub mod http_embedder;
