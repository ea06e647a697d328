use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::unbounded;
use tx7patch::{Bank, CancelToken, Error, FrameAssembler, FrameReceiver, Mode, State};

mod common;
use common::handmade_bulk_dump;

#[test]
fn leading_and_trailing_noise_is_discarded() {
    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = frames.clone();
    let mut assembler = FrameAssembler::new(Mode::SingleShot);
    assembler.on_complete(move |frame| sink.lock().unwrap().push(frame));

    assembler.feed(&[0x01, 0x02]);
    assert_eq!(assembler.state(), State::Idle);
    assembler.feed(&[0xF0, 0x43]);
    assert_eq!(assembler.state(), State::Receiving);
    assembler.feed(&[0x20, 0xF7]);
    assembler.feed(&[0x99]);

    assert_eq!(assembler.state(), State::Complete);
    assert_eq!(*frames.lock().unwrap(), vec![vec![0xF0, 0x43, 0x20, 0xF7]]);
}

#[test]
fn bulk_dump_survives_odd_chunking() {
    let dump = handmade_bulk_dump();
    let mut stream = vec![0xFE, 0xF8, 0x90, 0x3C, 0x40];
    stream.extend_from_slice(&dump);
    stream.extend_from_slice(&[0xF8, 0xFE]);

    let frames = Arc::new(Mutex::new(Vec::new()));
    let sink = frames.clone();
    let mut assembler = FrameAssembler::new(Mode::Continuous);
    assembler.on_complete(move |frame| sink.lock().unwrap().push(frame));

    let mut pos = 0;
    let mut size = 1;
    while pos < stream.len() {
        let end = (pos + size).min(stream.len());
        assembler.feed(&stream[pos..end]);
        pos = end;
        size = size % 97 + 3;
    }

    let frames = frames.lock().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0], dump);
    assert_eq!(Bank::decode(frames[0].clone()).unwrap().voices.len(), 32);
}

#[test]
fn receiver_delivers_consecutive_frames() {
    let (tx, rx) = unbounded();
    let receiver = FrameReceiver::spawn(rx);
    let cancel = CancelToken::new();

    let dump = handmade_bulk_dump();
    for chunk in dump.chunks(100) {
        tx.send(chunk.to_vec()).unwrap();
    }
    tx.send(vec![0xF0, 0x43, 0x20, 0x09, 0x00, 0xF7]).unwrap();
    drop(tx);

    let first = receiver.recv_frame(Duration::from_secs(5), &cancel).unwrap();
    assert_eq!(first, dump);
    let second = receiver.recv_frame(Duration::from_secs(5), &cancel).unwrap();
    assert_eq!(second, vec![0xF0, 0x43, 0x20, 0x09, 0x00, 0xF7]);
    assert!(matches!(
        receiver.recv_frame(Duration::from_secs(5), &cancel),
        Err(Error::Disconnected)
    ));
}

#[test]
fn frame_after_timeout_arrives_clean() {
    let (tx, rx) = unbounded();
    let receiver = FrameReceiver::spawn(rx);
    let dump = handmade_bulk_dump();
    tx.send(dump[..100].to_vec()).unwrap();

    let err = receiver
        .recv_frame(Duration::from_millis(50), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, Error::Timeout(t) if t == Duration::from_millis(50)));

    // the rest of the abandoned dump is noise now
    tx.send(dump[100..].to_vec()).unwrap();
    for chunk in dump.chunks(64) {
        tx.send(chunk.to_vec()).unwrap();
    }
    let frame = receiver
        .recv_frame(Duration::from_secs(5), &CancelToken::new())
        .unwrap();
    assert_eq!(frame, dump);
    assert_eq!(Bank::decode(frame).unwrap().voices.len(), 32);
}

#[test]
fn cancelled_wait_drops_partial_frame() {
    let (tx, rx) = unbounded();
    let receiver = FrameReceiver::spawn(rx);
    tx.send(vec![0xF0, 0x43, 0x00]).unwrap();
    std::thread::sleep(Duration::from_millis(50));

    let cancel = CancelToken::new();
    cancel.cancel();
    assert!(matches!(
        receiver.recv_frame(Duration::from_secs(5), &cancel),
        Err(Error::Cancelled)
    ));

    tx.send(vec![0xF0, 0x43, 0x20, 0xF7]).unwrap();
    let frame = receiver
        .recv_frame(Duration::from_secs(5), &CancelToken::new())
        .unwrap();
    assert_eq!(frame, vec![0xF0, 0x43, 0x20, 0xF7]);
}
