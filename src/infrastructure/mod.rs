// Infrastructure layer - External dependencies and adapters
pub mod backend_client;
pub mod chunked_json;
pub mod config;
pub mod filemanager_client;
pub mod http_response;

#[cfg(test)]
pub mod test_server;
