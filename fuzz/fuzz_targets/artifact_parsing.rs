// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Artifact parsing under adversarial input.
//!
//! Artifacts are downloaded and parsed on the client, so a damaged or crafted
//! `.docsift` file must end in an error, never a panic or a runaway
//! allocation. Inputs are tried twice: as-is (mostly rejected by the checksum)
//! and resealed with a valid CRC so the block decoders see the damage.

#![no_main]

use docsift::binary::{decode_index, encode_index, Footer};
use docsift::config::QueryOptions;
use docsift::IndexHandle;
use libfuzzer_sys::fuzz_target;

fn check(bytes: &[u8]) {
    let Ok(index) = decode_index(bytes) else {
        return;
    };

    // INVARIANT: whatever loads re-encodes to something that loads again
    let reencoded = encode_index(&index);
    assert_eq!(decode_index(&reencoded).ok().as_ref(), Some(&index));

    // INVARIANT: a loaded index answers queries without a diagnostic
    let handle = IndexHandle::new(index, QueryOptions::default());
    for query in ["a", "配置", "\"x y\""] {
        assert!(handle.search(query, None).diagnostic.is_none());
    }
}

fuzz_target!(|data: &[u8]| {
    check(data);

    let mut sealed = data.to_vec();
    sealed.truncate(sealed.len().min(1 << 20));
    let crc32 = Footer::compute_crc32(&sealed);
    Footer { crc32 }.write(&mut sealed);
    check(&sealed);
});
