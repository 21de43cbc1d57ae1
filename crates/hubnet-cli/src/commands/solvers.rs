//! `hubnet solvers`

use hubnet_algo::design::MipSolverKind;

pub fn handle() {
    let default = MipSolverKind::default();
    for name in MipSolverKind::available() {
        if *name == default.as_str() {
            println!("{name} (default)");
        } else {
            println!("{name}");
        }
    }
}
