#![no_main]

use libfuzzer_sys::fuzz_target;
use toroid_codegen::{emit_llvm, generate};
use toroid_config::{BoundsChecking, CodegenOpts, GridSize};
use toroid_grid::Grid;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let grid = Grid::new(s, GridSize::default());
        let tree = toroid_flow::build(&grid);
        for bounds_checking in [BoundsChecking::Checked, BoundsChecking::Unchecked] {
            let opts = CodegenOpts { bounds_checking, ..Default::default() };
            if let Ok(module) = generate(&tree, &opts) {
                let _ = emit_llvm(&module);
            }
        }
    }
});
