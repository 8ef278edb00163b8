//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use roomcast_server::{domain::ClientEvent, infrastructure::codec};
use roomcast_shared::time::now_millis;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use crate::{
    command::parse_line,
    domain::{Action, SessionState},
    error::ClientError,
    formatter::MessageFormatter,
    ui::print_with_prompt,
};

type WsWriter = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Run one connection until the user quits or the connection is lost.
///
/// # Arguments
///
/// * `url` - WebSocket URL of the server
/// * `state` - Membership state, carried over between connections
/// * `input` - Lines typed by the user
/// * `prompt` - Prompt to redisplay after printing
///
/// # Returns
///
/// * `Ok(())` - the user quit
/// * `Err(ClientError)` - the connection failed or was lost
pub async fn run_client_session(
    url: &str,
    state: &mut SessionState,
    input: &mut mpsc::UnboundedReceiver<String>,
    prompt: &str,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::from_connect_error(url, e))?;

    tracing::info!("Connected to {}", url);
    print_with_prompt(
        &MessageFormatter::format_notice(&format!(
            "Connected as '{}'. Type /help for commands, /quit to exit.",
            state.default_name()
        )),
        prompt,
    );

    let (mut write, mut read) = ws_stream.split();

    for event in state.on_connected() {
        send_event(&mut write, &event).await?;
    }

    loop {
        tokio::select! {
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => handle_frame(state, text.as_str(), prompt),
                Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
                    Ok(text) => handle_frame(state, text, prompt),
                    Err(_) => print_with_prompt(
                        &MessageFormatter::format_raw_message(&format!("<{} bytes>", data.len())),
                        prompt,
                    ),
                },
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Server closed the connection");
                    return Err(ClientError::ConnectionLost);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return Err(ClientError::ConnectionLost);
                }
            },
            line = input.recv() => {
                let Some(line) = line else {
                    // Ctrl+C / Ctrl+D
                    let _ = write.close().await;
                    return Ok(());
                };
                match parse_line(&line).and_then(|command| state.handle_command(command)) {
                    Ok(Action::Send(event)) => send_event(&mut write, &event).await?,
                    Ok(Action::Print(text)) => {
                        print_with_prompt(&MessageFormatter::format_notice(&text), prompt)
                    }
                    Ok(Action::Quit) => {
                        let _ = write.close().await;
                        return Ok(());
                    }
                    Err(e) => {
                        print_with_prompt(&MessageFormatter::format_notice(&e.to_string()), prompt)
                    }
                }
            }
        }
    }
}

fn handle_frame(state: &mut SessionState, text: &str, prompt: &str) {
    let output = match codec::decode_server_message(text) {
        Ok(event) => {
            state.apply(&event);
            MessageFormatter::format_server_event(&event, now_millis())
        }
        Err(e) => {
            tracing::debug!("Undecodable frame: {}", e);
            MessageFormatter::format_raw_message(text)
        }
    };
    print_with_prompt(&output, prompt);
}

async fn send_event(write: &mut WsWriter, event: &ClientEvent) -> Result<(), ClientError> {
    let frame = codec::encode_client_event(event);
    write.send(Message::Text(frame.into())).await.map_err(|e| {
        tracing::warn!("Failed to send frame: {}", e);
        ClientError::ConnectionLost
    })
}
