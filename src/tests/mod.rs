mod api_client;
mod mutations;
