// benches/pipeline_bench.rs

use bb84_sim::bb84::{encode_qubits, generate_key_and_basis};
use bb84_sim::eavesdropper::Eavesdropper;
use bb84_sim::error_correction::cascade_correction;
use bb84_sim::random::{RandomSource, RngSource};
use bb84_sim::simulation::{run_simulation, SimulationConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn benchmark_stages(c: &mut Criterion) {
    c.bench_function("generate_and_encode_1024", |b| {
        let mut rng = RngSource::seeded(1);
        b.iter(|| {
            let pair = generate_key_and_basis(black_box(1024), &mut rng).unwrap();
            encode_qubits(&pair)
        });
    });

    c.bench_function("intercept_1024", |b| {
        let mut rng = RngSource::seeded(2);
        let pair = generate_key_and_basis(1024, &mut rng).unwrap();
        let eve = Eavesdropper::default();
        b.iter(|| {
            let mut qubits = encode_qubits(&pair);
            eve.intercept(&mut qubits, &mut rng).unwrap()
        });
    });

    c.bench_function("cascade_correction_1024", |b| {
        let mut rng = RngSource::seeded(3);
        let sender = rng.uniform_bits(1024);
        let receiver = rng.uniform_bits(1024);
        b.iter(|| cascade_correction(black_box(&sender), black_box(&receiver)).unwrap());
    });
}

fn benchmark_pipeline(c: &mut Criterion) {
    let config = SimulationConfig {
        key_length: 1024,
        post_processing: true,
        ..Default::default()
    };
    c.bench_function("run_simulation_1024", |b| {
        let mut rng = RngSource::seeded(4);
        b.iter(|| run_simulation(black_box(&config), &mut rng).unwrap());
    });
}

criterion_group!(benches, benchmark_stages, benchmark_pipeline);
criterion_main!(benches);
