//! Codec benchmarks.

use cluck_core::{FrameHeader, Message, MessageCode, decode, encode};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn benchmark_header_wrap(c: &mut Criterion) {
    let frame = encode(MessageCode::RegisterUser.as_u16(), Some(b"Zed".as_slice())).unwrap();

    c.bench_function("header_wrap", |b| {
        b.iter(|| FrameHeader::wrap(black_box(&frame)))
    });
}

fn benchmark_encode(c: &mut Criterion) {
    let payload = b"register_user_success: Zed confirmed.";

    c.bench_function("encode_short_text", |b| {
        b.iter(|| encode(black_box(10), black_box(Some(payload.as_slice()))))
    });

    let msg = Message::text(MessageCode::CommandSuccess, "register_user_success: Zed confirmed.")
        .unwrap();
    c.bench_function("message_encode", |b| b.iter(|| black_box(&msg).encode()));
}

fn benchmark_decode(c: &mut Criterion) {
    let short = encode(MessageCode::UserStatus.as_u16(), Some(b"Zed".as_slice())).unwrap();
    let banner = vec![b'#'; 4096];
    let long = encode(MessageCode::Motd.as_u16(), Some(banner.as_slice())).unwrap();

    c.bench_function("decode_short", |b| b.iter(|| decode(black_box(&short))));
    c.bench_function("decode_4k", |b| b.iter(|| decode(black_box(&long))));
}

criterion_group!(benches, benchmark_header_wrap, benchmark_encode, benchmark_decode);
criterion_main!(benches);
