// tests/message_validation.rs

use procpool::server::{parse_message, ClientMessage, LineFramer, MessageError};
use procpool::types::MessageKind;

#[test]
fn status_message_is_accepted() {
    let msg = parse_message(br#"{"type": "status"}"#).unwrap();
    assert_eq!(msg, ClientMessage::Status);
    assert_eq!(msg.kind(), MessageKind::Status);
}

#[test]
fn run_message_carries_the_exact_command() {
    let msg = parse_message(br#"{"type": "run", "cmd": "  echo  hi "}"#).unwrap();
    assert_eq!(
        msg,
        ClientMessage::Run {
            cmd: "  echo  hi ".to_string()
        }
    );
}

#[test]
fn invalid_json_is_malformed() {
    let err = parse_message(b"{type: status").unwrap_err();
    assert!(matches!(err, MessageError::Malformed(_)));
    assert!(err.to_string().starts_with("Failed to decode JSON data"));
    assert!(!err.closes_connection());
}

#[test]
fn scalars_and_arrays_have_the_wrong_shape() {
    for (input, name) in [
        (&b"42"[..], "number"),
        (&b"\"status\""[..], "string"),
        (&b"[1,2]"[..], "array"),
        (&b"null"[..], "null"),
        (&b"true"[..], "bool"),
    ] {
        match parse_message(input) {
            Err(MessageError::WrongShape(got)) => assert_eq!(got, name),
            other => panic!("expected WrongShape for {input:?}, got {other:?}"),
        }
    }
}

#[test]
fn missing_or_non_string_type_is_rejected() {
    assert!(matches!(
        parse_message(br#"{"cmd": "ls"}"#),
        Err(MessageError::MissingType)
    ));
    assert!(matches!(
        parse_message(br#"{"type": 1}"#),
        Err(MessageError::MissingType)
    ));
}

#[test]
fn unknown_type_is_unsupported() {
    let err = parse_message(br#"{"type": "STATUS"}"#).unwrap_err();
    match &err {
        MessageError::UnsupportedType(t) => assert_eq!(t, "STATUS"),
        other => panic!("expected UnsupportedType, got {other:?}"),
    }
    assert_eq!(err.to_string(), "Unsupported message type \"STATUS\"");
}

#[test]
fn run_without_cmd_is_rejected_and_closes() {
    let err = parse_message(br#"{"type": "run"}"#).unwrap_err();
    assert!(matches!(err, MessageError::MissingCmd));
    assert!(err.closes_connection());

    let err = parse_message(br#"{"type": "run", "cmd": ["ls"]}"#).unwrap_err();
    assert!(matches!(err, MessageError::MissingCmd));
}

#[test]
fn client_messages_serialise_to_tagged_lines() {
    assert_eq!(ClientMessage::Status.to_line().unwrap(), "{\"type\":\"status\"}\n");

    let line = ClientMessage::Run {
        cmd: "echo \"x\"".to_string(),
    }
    .to_line()
    .unwrap();
    assert!(line.ends_with('\n'));
    assert_eq!(
        parse_message(line.trim_end().as_bytes()).unwrap(),
        ClientMessage::Run {
            cmd: "echo \"x\"".to_string()
        }
    );
}

#[test]
fn framer_splits_on_newlines_across_chunks() {
    let mut framer = LineFramer::new(1024);

    assert!(framer.push(b"{\"type\":").unwrap().is_empty());
    let messages = framer.push(b"\"status\"}\n{\"type\":\"run\"").unwrap();
    assert_eq!(messages, vec![b"{\"type\":\"status\"}".to_vec()]);

    let messages = framer.push(b",\"cmd\":\"ls\"}\r\n\n  \n").unwrap();
    assert_eq!(messages, vec![b"{\"type\":\"run\",\"cmd\":\"ls\"}".to_vec()]);
    assert_eq!(framer.finish(), None);
}

#[test]
fn framer_returns_unterminated_rest_on_finish() {
    let mut framer = LineFramer::new(1024);
    assert!(framer.push(b"{\"type\":\"status\"}").unwrap().is_empty());
    assert_eq!(framer.finish(), Some(b"{\"type\":\"status\"}".to_vec()));
}

#[test]
fn framer_rejects_oversized_message() {
    let mut framer = LineFramer::new(8);
    let err = framer.push(b"0123456789").unwrap_err();
    assert_eq!(err.limit, 8);
    assert_eq!(framer.finish(), None);
}
