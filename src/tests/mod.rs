mod classifier;
mod request;
