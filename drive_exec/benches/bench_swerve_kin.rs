//! # Swerve Kinematics Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use drive_lib::holo_ctrl::ChassisSpeeds;
use drive_lib::swerve_kin::{Params, SwerveKin};

fn swerve_kin_benchmark(c: &mut Criterion) {
    // ---- Build the demo drivetrain geometry ----

    let kin = SwerveKin::new(&Params {
        module_pos_m_rb: vec![
            [0.3, 0.3],
            [0.3, -0.3],
            [-0.3, 0.3],
            [-0.3, -0.3],
        ],
        max_wheel_speed_ms: 4.0,
    })
    .unwrap();

    // A demand exercising all three components
    let speeds = ChassisSpeeds {
        vx_ms: 1.2,
        vy_ms: -0.4,
        omega_rads: 0.8,
    };

    c.bench_function("to_module_states", |b| {
        b.iter(|| {
            let mut states = kin.to_module_states(&speeds);
            kin.desaturate(&mut states);
            states
        })
    });
}

criterion_group!(benches, swerve_kin_benchmark);
criterion_main!(benches);
