use chrono::{TimeZone, Utc};

use super::frame::Frame;
use super::message::{Message, PRIORITY_USER_INFO};

fn minimal_message() -> Message {
    Message {
        priority: PRIORITY_USER_INFO,
        timestamp: Utc.timestamp_opt(0, 0).unwrap(),
        hostname: String::new(),
        app_name: String::new(),
        proc_id: String::new(),
        msg_id: String::new(),
        structured_data: Vec::new(),
        payload: b"some-log-message".to_vec(),
    }
}

#[test]
fn test_encode_prefixes_octet_count() {
    let msg = minimal_message();
    let frame = Frame::new(&msg).encode();

    assert_eq!(
        frame.as_ref(),
        b"59 <14>1 1970-01-01T00:00:00+00:00 - - - - - some-log-message\n".as_slice(),
    );
}

#[test]
fn test_encode_count_matches_body() {
    let mut msg = minimal_message();
    msg.hostname = "host".into();
    msg.payload = b"payload with spaces".to_vec();

    let frame = Frame::new(&msg).encode();
    let space = frame.iter().position(|&b| b == b' ').unwrap();
    let count: usize = std::str::from_utf8(&frame[..space]).unwrap().parse().unwrap();

    assert_eq!(count, frame.len() - space - 1);
    assert_eq!(count, msg.encode().len());
}

#[tokio::test]
async fn test_write_to_returns_byte_count() {
    let msg = minimal_message();
    let mut out: Vec<u8> = Vec::new();

    let written = Frame::new(&msg).write_to(&mut out).await.unwrap();

    assert_eq!(written, out.len());
    assert_eq!(out, Frame::new(&msg).encode());
}

#[tokio::test]
async fn test_frames_concatenate_on_stream() {
    let first = minimal_message();
    let mut second = minimal_message();
    second.payload = b"another".to_vec();

    let mut out: Vec<u8> = Vec::new();
    Frame::new(&first).write_to(&mut out).await.unwrap();
    Frame::new(&second).write_to(&mut out).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("59 <14>1 "));
    assert!(lines[1].ends_with("another\n"));
}
