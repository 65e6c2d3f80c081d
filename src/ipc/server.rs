//! Per-connection worker loop: decodes one [`Message`] at a time, dispatches
//! it against the [`SessionRegistry`], and always writes a [`Response`] —
//! engine/session errors are logged and turned into a zero `result`, never
//! propagated across the pipe (per the error-handling design: the wire
//! protocol cannot carry a typed error).

use crate::input::{codec::KeyCodec, KeyEvent, Modifiers};
use crate::ipc::protocol::{modifier_flags, unpack_coordinates, Command, Message, Response};
use crate::ipc::transport::{Connection, TransportError};
use crate::session::engine::EngineSession;
use crate::session::registry::{SessionError, SessionId, SessionRegistry};
use std::sync::Arc;
use tracing::{debug, warn};

/// Constructs a fresh engine session for `IPC_START_SESSION`. Production
/// code backs this with a RIME session factory; tests use the fake engine.
pub trait EngineSessionFactory: Send + Sync {
    fn create(&self) -> Box<dyn EngineSession>;
}

/// Runs one client connection to completion (until the pipe closes or
/// `IPC_SHUTDOWN` is received). Returns `true` if shutdown was requested.
pub async fn serve_connection(
    mut conn: impl Connection,
    registry: Arc<SessionRegistry>,
    factory: Arc<dyn EngineSessionFactory>,
) -> bool {
    let codec = KeyCodec::new();
    loop {
        let msg = match conn.read_message().await {
            Ok(msg) => msg,
            Err(TransportError::Closed) => return false,
            Err(e) => {
                warn!(error = %e, "ipc read failed");
                return false;
            }
        };

        let Some(command) = Command::from_u32(msg.cmd) else {
            warn!(cmd = msg.cmd, "unknown ipc command");
            let _ = conn.write_response(Response::zero(), &[]).await;
            continue;
        };

        let (response, payload, shutdown) =
            dispatch(command, msg, &registry, factory.as_ref(), &codec);

        if let Err(e) = conn.write_response(response, &payload).await {
            warn!(error = %e, "ipc write failed");
            return false;
        }
        if shutdown {
            return true;
        }
    }
}

fn dispatch(
    command: Command,
    msg: Message,
    registry: &SessionRegistry,
    factory: &dyn EngineSessionFactory,
    codec: &KeyCodec,
) -> (Response, Vec<u8>, bool) {
    let session_id: SessionId = msg.session_id;
    match command {
        Command::Echo => (Response::ok(), vec![], false),

        Command::StartSession => {
            let new_id = registry.start_new(factory.create());
            debug!(session_id = new_id, "session started");
            (
                Response {
                    result: new_id,
                    data_size: 0,
                },
                vec![],
                false,
            )
        }

        Command::EndSession => match registry.end(session_id) {
            Ok(()) => (Response::ok(), vec![], false),
            Err(SessionError::NotFound(_)) => (Response::zero(), vec![], false),
            Err(e) => {
                warn!(session_id, error = %e, "end_session failed");
                (Response::zero(), vec![], false)
            }
        },

        Command::ProcessKey => {
            let shift = msg.param2 & modifier_flags::SHIFT != 0;
            let Some(sym) = codec.translate(msg.param1, shift) else {
                return (Response::zero(), vec![], false);
            };
            let key = KeyEvent::new(sym, wire_modifiers(msg.param2));
            match registry.with_session(session_id, |s| s.process_key(key)) {
                Ok(true) => (Response::ok(), vec![], false),
                Ok(false) => (Response::zero(), vec![], false),
                Err(e) => {
                    warn!(session_id, error = %e, "process_key on unknown session");
                    (Response::zero(), vec![], false)
                }
            }
        }

        Command::TestKey => {
            let shift = msg.param2 & modifier_flags::SHIFT != 0;
            let Some(sym) = codec.translate(msg.param1, shift) else {
                return (Response::zero(), vec![], false);
            };
            let key = KeyEvent::new(sym, wire_modifiers(msg.param2));
            match registry.with_session(session_id, |s| s.would_consume(key)) {
                Ok(true) => (Response::ok(), vec![], false),
                Ok(false) => (Response::zero(), vec![], false),
                Err(e) => {
                    warn!(session_id, error = %e, "test_key on unknown session");
                    (Response::zero(), vec![], false)
                }
            }
        }

        Command::FocusIn => match registry.with_session(session_id, |s| s.activate()) {
            Ok(()) => (Response::ok(), vec![], false),
            Err(_) => (Response::zero(), vec![], false),
        },

        Command::FocusOut => match registry.with_session(session_id, |s| s.deactivate()) {
            Ok(()) => (Response::ok(), vec![], false),
            Err(_) => (Response::zero(), vec![], false),
        },

        Command::UpdatePosition => {
            let (x, y) = unpack_coordinates(msg.param1);
            debug!(session_id, x, y, "caret position updated");
            match registry.with_session(session_id, |s| s.set_caret_position(x as i32, y as i32)) {
                Ok(()) => (Response::ok(), vec![], false),
                Err(_) => (Response::zero(), vec![], false),
            }
        }

        Command::Commit => match registry.with_session(session_id, |s| s.commit()) {
            Ok(text) if text.is_empty() => (Response::zero(), vec![], false),
            Ok(text) => {
                let utf16: Vec<u8> = text
                    .encode_utf16()
                    .flat_map(|u| u.to_le_bytes())
                    .collect();
                (Response::with_data(utf16.len() as u32), utf16, false)
            }
            Err(_) => (Response::zero(), vec![], false),
        },

        Command::Clear => match registry.with_session(session_id, |s| s.reset()) {
            Ok(()) => (Response::ok(), vec![], false),
            Err(_) => (Response::zero(), vec![], false),
        },

        Command::SelectCandidate => {
            match registry.with_session(session_id, |s| s.select_candidate(msg.param1)) {
                Ok(true) => (Response::ok(), vec![], false),
                Ok(false) => (Response::zero(), vec![], false),
                Err(_) => (Response::zero(), vec![], false),
            }
        }

        Command::Shutdown => (Response::ok(), vec![], true),
    }
}

fn wire_modifiers(flags: u32) -> Modifiers {
    let mut m = Modifiers::NONE;
    if flags & modifier_flags::SHIFT != 0 {
        m = m | Modifiers::SHIFT;
    }
    if flags & modifier_flags::CONTROL != 0 {
        m = m | Modifiers::CONTROL;
    }
    if flags & modifier_flags::ALT != 0 {
        m = m | Modifiers::ALT;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ipc::transport::FramedConnection;
    use crate::session::engine::fake::FakeEngine;

    struct FakeFactory;
    impl EngineSessionFactory for FakeFactory {
        fn create(&self) -> Box<dyn EngineSession> {
            Box::new(FakeEngine::default())
        }
    }

    async fn roundtrip(
        client: &mut FramedConnection<tokio::io::DuplexStream>,
        msg: Message,
    ) -> Response {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        client.stream.write_all(&msg.to_bytes()).await.unwrap();
        let mut header = [0u8; Response::WIRE_SIZE];
        client.stream.read_exact(&mut header).await.unwrap();
        Response::from_bytes(&header)
    }

    #[tokio::test]
    async fn start_process_commit_end_session_flow() {
        let (client, server) = tokio::io::duplex(1024);
        let registry = Arc::new(SessionRegistry::new());
        let factory: Arc<dyn EngineSessionFactory> = Arc::new(FakeFactory);

        let server_task = tokio::spawn(serve_connection(
            FramedConnection::new(server),
            registry.clone(),
            factory,
        ));

        let mut client_conn = FramedConnection::new(client);

        let start = Message {
            cmd: Command::StartSession as u32,
            session_id: 0,
            param1: 0,
            param2: 0,
        };
        let start_resp = roundtrip(&mut client_conn, start).await;
        assert_ne!(start_resp.result, 0);
        let session_id = start_resp.result;

        let key = Message {
            cmd: Command::ProcessKey as u32,
            session_id,
            param1: 0x41, // VK_A
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, key).await, Response::ok());

        let commit = Message {
            cmd: Command::Commit as u32,
            session_id,
            param1: 0,
            param2: 0,
        };
        let resp = roundtrip(&mut client_conn, commit).await;
        assert_eq!(resp.result, 1);
        assert_eq!(resp.data_size, 2); // one UTF-16 code unit

        let shutdown = Message {
            cmd: Command::Shutdown as u32,
            session_id,
            param1: 0,
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, shutdown).await, Response::ok());

        assert!(server_task.await.unwrap());
    }

    #[tokio::test]
    async fn start_session_allocates_a_distinct_id_each_time() {
        let (client, server) = tokio::io::duplex(1024);
        let registry = Arc::new(SessionRegistry::new());
        let factory: Arc<dyn EngineSessionFactory> = Arc::new(FakeFactory);

        tokio::spawn(serve_connection(
            FramedConnection::new(server),
            registry,
            factory,
        ));

        let mut client_conn = FramedConnection::new(client);
        let start = Message {
            cmd: Command::StartSession as u32,
            session_id: 0,
            param1: 0,
            param2: 0,
        };
        let first = roundtrip(&mut client_conn, start).await.result;
        let second = roundtrip(&mut client_conn, start).await.result;
        assert_ne!(first, 0);
        assert_ne!(second, 0);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn commit_with_nothing_pending_returns_zero_and_empty_payload() {
        let (client, server) = tokio::io::duplex(1024);
        let registry = Arc::new(SessionRegistry::new());
        let factory: Arc<dyn EngineSessionFactory> = Arc::new(FakeFactory);

        tokio::spawn(serve_connection(
            FramedConnection::new(server),
            registry,
            factory,
        ));

        let mut client_conn = FramedConnection::new(client);
        let start = Message {
            cmd: Command::StartSession as u32,
            session_id: 1,
            param1: 0,
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, start).await, Response::ok());

        let commit = Message {
            cmd: Command::Commit as u32,
            session_id: 1,
            param1: 0,
            param2: 0,
        };
        let resp = roundtrip(&mut client_conn, commit).await;
        assert_eq!(resp, Response::zero());
    }

    #[tokio::test]
    async fn process_key_on_unknown_session_returns_zero() {
        let (client, server) = tokio::io::duplex(1024);
        let registry = Arc::new(SessionRegistry::new());
        let factory: Arc<dyn EngineSessionFactory> = Arc::new(FakeFactory);

        tokio::spawn(serve_connection(
            FramedConnection::new(server),
            registry,
            factory,
        ));

        let mut client_conn = FramedConnection::new(client);
        let key = Message {
            cmd: Command::ProcessKey as u32,
            session_id: 99,
            param1: 0x41,
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, key).await, Response::zero());
    }

    #[tokio::test]
    async fn test_key_agrees_with_process_key_in_english_mode() {
        let (client, server) = tokio::io::duplex(1024);
        let registry = Arc::new(SessionRegistry::new());
        let factory: Arc<dyn EngineSessionFactory> = Arc::new(FakeFactory);

        tokio::spawn(serve_connection(
            FramedConnection::new(server),
            registry.clone(),
            factory,
        ));

        let mut client_conn = FramedConnection::new(client);
        let start = Message {
            cmd: Command::StartSession as u32,
            session_id: 0,
            param1: 0,
            param2: 0,
        };
        let session_id = roundtrip(&mut client_conn, start).await.result;

        // English mode never intercepts character keys; TEST_KEY must say
        // so too instead of guessing "consume" from the key's character
        // class alone.
        registry
            .with_session(session_id, |s| s.set_mode(crate::session::engine::Mode::English))
            .unwrap();

        let test = Message {
            cmd: Command::TestKey as u32,
            session_id,
            param1: 0x41, // VK_A
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, test).await, Response::zero());

        let process = Message {
            cmd: Command::ProcessKey as u32,
            session_id,
            param1: 0x41,
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, process).await, Response::zero());
    }

    #[tokio::test]
    async fn test_key_agrees_with_process_key_in_chinese_mode() {
        let (client, server) = tokio::io::duplex(1024);
        let registry = Arc::new(SessionRegistry::new());
        let factory: Arc<dyn EngineSessionFactory> = Arc::new(FakeFactory);

        tokio::spawn(serve_connection(
            FramedConnection::new(server),
            registry,
            factory,
        ));

        let mut client_conn = FramedConnection::new(client);
        let start = Message {
            cmd: Command::StartSession as u32,
            session_id: 0,
            param1: 0,
            param2: 0,
        };
        let session_id = roundtrip(&mut client_conn, start).await.result;

        let test = Message {
            cmd: Command::TestKey as u32,
            session_id,
            param1: 0x41,
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, test).await, Response::ok());

        let process = Message {
            cmd: Command::ProcessKey as u32,
            session_id,
            param1: 0x41,
            param2: 0,
        };
        assert_eq!(roundtrip(&mut client_conn, process).await, Response::ok());
    }
}
