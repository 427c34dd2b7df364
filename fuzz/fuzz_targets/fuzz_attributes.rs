// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fuzz target for the packed attribute encoding

#![no_main]

use arbitrary::Arbitrary;
use fsn_core::attributes::{encode, AttributeTriple, FileKind};
use fsn_core::mode::ModeChange;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    mode: u32,
    uid: u32,
    gid: u32,
    writable: Option<bool>,
    executable: Option<bool>,
    word: i32,
}

fuzz_target!(|input: Input| {
    let triple = encode(input.mode, input.uid, input.gid);

    // Kind nibble is a real type, never the error marker
    let kind = triple.kind().expect("kind nibble out of range");
    assert_ne!(kind, FileKind::Error);

    // Nothing outside bits 0..16
    assert_eq!(triple.attributes as u32 & !0xFFFF, 0);

    let decoded = triple.decode().expect("valid triple must decode");
    assert_eq!(decoded.permissions.mode(), input.mode & 0o777);
    assert_eq!(decoded.triple(), triple);

    // Toggles only ever touch write/execute bits
    let change = ModeChange { writable: input.writable, executable: input.executable };
    let changed = change.apply(input.mode);
    assert_eq!(changed & !0o333, input.mode & !0o333);

    // Arbitrary words decode or are rejected, never panic
    let _ = AttributeTriple { attributes: input.word, uid: 0, gid: 0 }.decode();
});
