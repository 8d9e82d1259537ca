mod transport;

pub use transport::SignalingTransport;
