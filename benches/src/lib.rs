//! Sample programs shared by the benchmarks.

use toroid::{
    codegen::{self, Interpreter, Module, StdRandom},
    config::{CodegenOpts, GridSize},
    flow::{self, ControlTree},
    grid::Grid,
};

/// A benchmark input.
#[derive(Clone, Copy, Debug)]
pub struct Source {
    pub name: &'static str,
    pub src: &'static str,
    /// Whether the program halts, and can therefore be interpreted.
    pub halts: bool,
}

/// Please do not modify the order of the sources and only add new sources at the end.
pub const SRCS: &[Source] = &[
    Source { name: "empty", src: "@", halts: true },
    Source { name: "hello", src: r#""!dlrow ,olleH">:#,_@"#, halts: true },
    Source { name: "countdown", src: "91+>:68*+,1-:v\n   ^         _@", halts: true },
    Source {
        name: "maze",
        src: concat!(
            "v>>>>>>>v\n",
            "?<<<<<<<?\n",
            ">?v?^?v?<\n",
            "^<,>?<#^\n",
            ">:1+:9`#@_\n",
            "^ ?   < <\n",
        ),
        halts: false,
    },
    Source { name: "full_grid", src: FULL_GRID, halts: false },
];

/// Eight full-width rows of arithmetic with a divergence in every row.
const FULL_GRID: &str = concat!(
    "v  123+*456-/789%:\\$! `  ?  >  v  123+*456-/789%:\\$! `  ?  >  v  123+*456-/789%\n",
    ">  987+*654-/321%:\\$! `  _  <  v  987+*654-/321%:\\$! `  |  <  v  987+*654-/321%\n",
    "^  246+*135-/975%:\\$! `  ?  >  v  246+*135-/975%:\\$! `  ?  >  v  246+*135-/975%\n",
    ">  864+*531-/579%:\\$! `  _  <  v  864+*531-/579%:\\$! `  |  <  v  864+*531-/579%\n",
    "^  112+*223-/334%:\\$! `  ?  >  v  112+*223-/334%:\\$! `  ?  >  v  112+*223-/334%\n",
    ">  445+*556-/667%:\\$! `  _  <  v  445+*556-/667%:\\$! `  |  <  v  445+*556-/667%\n",
    "^  778+*889-/991%:\\$! `  ?  >  v  778+*889-/991%:\\$! `  ?  >  v  778+*889-/991%\n",
    ">  13579+*2468-/%:\\$! `  _  <  v  13579+*2468-/%:\\$! `  |  <  v  13579+*2468-/%\n",
);

/// Returns the source with the given name.
///
/// # Panics
///
/// Panics if there is no such source.
pub fn get_src(name: &str) -> &'static Source {
    SRCS.iter().find(|s| s.name == name).unwrap_or_else(|| panic!("no source named {name:?}"))
}

/// Reflows `src` into a default-sized grid.
pub fn grid(src: &str) -> Grid {
    Grid::new(src, GridSize::default())
}

/// Builds the control-flow tree of `src`.
pub fn tree(src: &str) -> ControlTree {
    flow::build(&grid(src))
}

/// Lowers `src` to MIR.
///
/// # Panics
///
/// Panics if the program uses an instruction the code generator rejects.
pub fn module(src: &str, opts: &CodegenOpts) -> Module {
    codegen::generate(&tree(src), opts).unwrap()
}

/// Runs `module` with a fixed seed, returning what it printed.
pub fn run(module: &Module, fuel: u64) -> Vec<u8> {
    let mut interp = Interpreter::new(module).with_fuel(fuel).with_random(StdRandom::seeded(0));
    let _ = interp.run();
    interp.into_output()
}
