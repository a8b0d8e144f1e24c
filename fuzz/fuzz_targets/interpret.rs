#![no_main]

use libfuzzer_sys::fuzz_target;
use toroid_codegen::{Interpreter, StdRandom, generate};
use toroid_config::{CodegenOpts, GridSize};
use toroid_grid::Grid;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let grid = Grid::new(s, GridSize::default());
        let tree = toroid_flow::build(&grid);
        if let Ok(module) = generate(&tree, &CodegenOpts::default()) {
            let _ = Interpreter::new(&module).with_fuel(10_000).with_random(StdRandom::seeded(0)).run();
        }
    }
});
