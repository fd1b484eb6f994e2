//! Test helpers: real WebSocket connections over in-memory pipes
//!
//! Every helper performs an actual RFC 6455 handshake across a
//! `tokio::io::duplex` pair, so tests exercise the same codec path as
//! production without touching the network.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::StreamExt;
use tokio::io::{duplex, DuplexStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, client_async, WebSocketStream};

use crate::hub::Hub;
use crate::registry::PeerId;

const PIPE_CAPACITY: usize = 4096;

/// Handshake an in-memory connection and split the server side
///
/// Returns the server's write half, the server's read half, and the
/// client-side socket. Drop the client to make server writes fail.
pub(crate) async fn ws_server_halves() -> (
    SplitSink<WebSocketStream<DuplexStream>, Message>,
    SplitStream<WebSocketStream<DuplexStream>>,
    WebSocketStream<DuplexStream>,
) {
    let (server_io, client_io) = duplex(PIPE_CAPACITY);

    let (server, client) = tokio::join!(
        accept_async(server_io),
        client_async("ws://localhost/chat", client_io),
    );

    let (writer, reader) = server.expect("server handshake").split();
    let (client, _response) = client.expect("client handshake");

    (writer, reader, client)
}

/// Connect a fresh peer through the hub's upgrade path
///
/// The hub registers the peer and spawns its receive loop; the returned
/// client socket drives it.
pub(crate) async fn upgrade_pair(
    hub: &Hub<DuplexStream>,
) -> (PeerId, WebSocketStream<DuplexStream>) {
    let (server_io, client_io) = duplex(PIPE_CAPACITY);

    let (id, client) = tokio::join!(
        hub.handle_upgrade(server_io),
        client_async("ws://localhost/chat", client_io),
    );

    let (client, _response) = client.expect("client handshake");

    (id.expect("upgrade"), client)
}
