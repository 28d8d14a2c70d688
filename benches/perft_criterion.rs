use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use corvid::attacks;
use corvid::board::{Board, START_FEN};
use corvid::perft::perft;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_nodes: &'static [u64],
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: START_FEN,
        expected_nodes: &[20, 400, 8_902, 197_281],
    },
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_nodes: &[48, 2_039, 97_862],
    },
    BenchCase {
        name: "endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_nodes: &[14, 191, 2_812, 43_238],
    },
];

fn bench_perft(c: &mut Criterion) {
    attacks::init();

    let mut group = c.benchmark_group("perft");
    group.measurement_time(Duration::from_secs(10));

    for case in CASES {
        let depth = case.expected_nodes.len() as u32;
        let nodes = case.expected_nodes[depth as usize - 1];
        group.throughput(Throughput::Elements(nodes));

        group.bench_with_input(
            BenchmarkId::new(case.name, depth),
            &depth,
            |bencher, &depth| {
                let mut board = Board::from_fen(case.fen).expect("bench FEN is valid");
                bencher.iter(|| {
                    let count = perft(&mut board, black_box(depth));
                    assert_eq!(count, nodes);
                    count
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_perft);
criterion_main!(benches);
