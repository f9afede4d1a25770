// SPDX-License-Identifier: ISC
use lzf_codec::{Error, decompress};

enum Expect {
    Output(&'static [u8]),
    Invalid,
}

struct Case {
    name: &'static str,
    input: &'static [u8],
    expect: Expect,
}

const CASES: &[Case] = &[
    Case { name: "empty", input: b"", expect: Expect::Output(b"") },
    Case { name: "single_literal", input: &[0x00, b'z'], expect: Expect::Output(b"z") },
    Case {
        name: "max_literal_run",
        input: b"\x1f0123456789abcdefghijklmnopqrstuv",
        expect: Expect::Output(b"0123456789abcdefghijklmnopqrstuv"),
    },
    Case {
        name: "overlap_distance_one",
        input: &[0x00, b'a', 0xe0, 0x01, 0x00],
        expect: Expect::Output(b"aaaaaaaaaaa"),
    },
    Case {
        name: "overlap_repeats_pattern",
        input: &[0x01, b'a', b'b', 0x40, 0x01],
        expect: Expect::Output(b"ababab"),
    },
    Case {
        name: "non_overlapping_copy",
        input: &[0x03, b'a', b'b', b'c', b'd', 0x40, 0x03],
        expect: Expect::Output(b"abcdabcd"),
    },
    Case {
        name: "max_match_length",
        input: &[0x00, b'q', 0xe0, 0xff, 0x00],
        expect: Expect::Output(&[b'q'; 265]),
    },
    Case { name: "backref_without_history", input: &[0x20, 0x00], expect: Expect::Invalid },
    Case {
        name: "offset_past_start",
        input: &[0x00, b'a', 0x20, 0x01],
        expect: Expect::Invalid,
    },
    Case {
        name: "max_offset_past_start",
        input: &[0x03, b'a', b'b', b'c', b'd', 0x3f, 0xff],
        expect: Expect::Invalid,
    },
    Case { name: "truncated_literal", input: &[0x05, b'a', b'b'], expect: Expect::Invalid },
    Case { name: "truncated_long_length", input: &[0x00, b'a', 0xe0], expect: Expect::Invalid },
    Case {
        name: "truncated_long_offset",
        input: &[0x00, b'a', 0xe0, 0x00],
        expect: Expect::Invalid,
    },
    Case { name: "truncated_short_offset", input: &[0x00, b'a', 0x20], expect: Expect::Invalid },
];

#[test]
fn regression_raw_cases() {
    for case in CASES {
        let result = decompress(case.input);
        match case.expect {
            Expect::Output(expected) => {
                let got = result.unwrap_or_else(|e| panic!("case {}: {e}", case.name));
                assert_eq!(got, expected, "case {}: output mismatch", case.name);
            }
            Expect::Invalid => {
                let err = result.expect_err(&format!("case {}: expected error", case.name));
                assert!(
                    matches!(err, Error::InvalidCompressedData),
                    "case {}: got {err:?}",
                    case.name
                );
            }
        }
    }
}
