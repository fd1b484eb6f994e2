//! Line-oriented chat client example
//!
//! Run with: cargo run --example chat_client [SERVER_ADDR]
//!
//! Reads lines from stdin and sends each one to the hub; prints every
//! frame broadcast by other clients. EOF (Ctrl+D) disconnects cleanly.

use futures_util::{SinkExt, StreamExt};
use tokio::io::AsyncBufReadExt;
use tokio::net::TcpStream;
use tokio_tungstenite::client_async;
use tokio_tungstenite::tungstenite::Message;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:8080".to_string())
        .replace("localhost", "127.0.0.1");

    let socket = TcpStream::connect(&addr).await?;
    socket.set_nodelay(true)?;

    let url = format!("ws://{}/chat", addr);
    let (ws, _response) = client_async(url.as_str(), socket).await?;
    let (mut writer, mut reader) = ws.split();

    println!("Connected to {} (type lines to chat, Ctrl+D to quit)", addr);

    // Print everything the hub fans out to us
    let printer = tokio::spawn(async move {
        while let Some(msg) = reader.next().await {
            match msg {
                Ok(Message::Text(text)) => println!("{}", text),
                Ok(Message::Close(_)) | Err(_) => {
                    println!("Server hung up");
                    break;
                }
                _ => {}
            }
        }
    });

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.is_empty() {
            continue;
        }
        writer.send(Message::Text(line)).await?;
    }

    writer.close().await.ok();
    printer.abort();

    Ok(())
}
