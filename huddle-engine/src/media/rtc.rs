//! `webrtc`-backed media connection.
//!
//! Wraps one `RTCPeerConnection` per remote peer and translates its
//! callbacks into [`RoomEvent`]s on the room queue.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

use huddle_core::model::{IceCandidate, IceServerConfig, ParticipantId, TrackKind};

use crate::media::connection::{
    ConnectionState, MediaConnection, MediaConnectionFactory, RemoteStream, SdpKind,
};
use crate::media::local::LocalStream;
use crate::room::RoomEvent;

pub struct RtcConnectionFactory {
    ice_servers: Vec<IceServerConfig>,
}

impl RtcConnectionFactory {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self { ice_servers }
    }
}

#[async_trait]
impl MediaConnectionFactory for RtcConnectionFactory {
    async fn create(
        &self,
        peer_id: &ParticipantId,
        local: &LocalStream,
        events: mpsc::Sender<RoomEvent>,
    ) -> Result<Box<dyn MediaConnection>> {
        let connection =
            RtcConnection::connect(peer_id.clone(), self.ice_servers.clone(), local, events)
                .await?;
        Ok(Box::new(connection))
    }
}

pub struct RtcConnection {
    peer_id: ParticipantId,
    peer_connection: Arc<RTCPeerConnection>,
}

impl RtcConnection {
    async fn connect(
        peer_id: ParticipantId,
        ice_servers: Vec<IceServerConfig>,
        local: &LocalStream,
        events: mpsc::Sender<RoomEvent>,
    ) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .context("registering codecs")?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .context("registering interceptors")?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .into_iter()
                .map(|server| RTCIceServer {
                    urls: server.urls,
                    username: server.username.unwrap_or_default(),
                    credential: server.credential.unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("creating peer connection")?,
        );

        // The shared capture tracks are attached before any description is
        // built so they land in the first offer/answer.
        for track in local.tracks() {
            let capability = match track.kind() {
                TrackKind::Audio => RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    ..Default::default()
                },
                TrackKind::Video => RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_VP8.to_owned(),
                    ..Default::default()
                },
            };
            let local_track: Arc<dyn TrackLocal + Send + Sync> = Arc::new(
                TrackLocalStaticSample::new(capability, track.id().to_owned(), "local".to_owned()),
            );
            peer_connection
                .add_track(local_track)
                .await
                .context("attaching local track")?;
        }

        let state_tx = events.clone();
        let state_peer = peer_id.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                let peer_id = state_peer.clone();

                Box::pin(async move {
                    debug!("connection state for {}: {}", peer_id, s);
                    let state = match s {
                        RTCPeerConnectionState::Connecting => ConnectionState::Connecting,
                        RTCPeerConnectionState::Connected => ConnectionState::Connected,
                        RTCPeerConnectionState::Disconnected => ConnectionState::Disconnected,
                        RTCPeerConnectionState::Failed => ConnectionState::Failed,
                        RTCPeerConnectionState::Closed => ConnectionState::Closed,
                        _ => return,
                    };
                    let _ = tx
                        .send(RoomEvent::ConnectionStateChanged { peer_id, state })
                        .await;
                })
            },
        ));

        // Trickle ICE: every locally discovered candidate goes to the room,
        // which relays it to the peer.
        let ice_tx = events.clone();
        let ice_peer = peer_id.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer_id = ice_peer.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let candidate = IceCandidate {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                };
                let _ = tx
                    .send(RoomEvent::CandidateDiscovered { peer_id, candidate })
                    .await;
            })
        }));

        let track_tx = events;
        let track_peer = peer_id.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                let peer_id = track_peer.clone();

                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => TrackKind::Audio,
                        RTPCodecType::Video => TrackKind::Video,
                        RTPCodecType::Unspecified => return,
                    };
                    debug!("remote {:?} track from {}", kind, peer_id);
                    let stream = RemoteStream {
                        id: track.stream_id(),
                        kinds: vec![kind],
                    };
                    let _ = tx.send(RoomEvent::TrackReceived { peer_id, stream }).await;
                })
            },
        ));

        Ok(Self {
            peer_id,
            peer_connection,
        })
    }
}

#[async_trait]
impl MediaConnection for RtcConnection {
    async fn create_offer(&self) -> Result<String> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .with_context(|| format!("creating offer for {}", self.peer_id))?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .context("setting local offer")?;
        Ok(offer.sdp)
    }

    async fn create_answer(&self) -> Result<String> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .with_context(|| format!("creating answer for {}", self.peer_id))?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .context("setting local answer")?;
        Ok(answer.sdp)
    }

    async fn set_remote_description(&self, kind: SdpKind, sdp: String) -> Result<()> {
        let desc = match kind {
            SdpKind::Offer => RTCSessionDescription::offer(sdp)?,
            SdpKind::Answer => RTCSessionDescription::answer(sdp)?,
        };
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("setting remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: None,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("adding ICE candidate")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
