mod connection;
mod local;
mod rtc;

pub use connection::{
    ConnectionState, MediaConnection, MediaConnectionFactory, RemoteStream, SdpKind,
};
pub use local::{LocalMediaProvider, LocalStream, LocalTrack, StaticMediaProvider};
pub use rtc::{RtcConnection, RtcConnectionFactory};
