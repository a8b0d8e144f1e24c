//! A MIR interpreter.
//!
//! Executes the `main` function of a module the way the compiled program would run: allocas are
//! zeroed `i64` cells, `putchar` output is captured, and `random`/`srandom` go through a pluggable
//! [`RandomSource`].

use crate::mir::{
    BlockId, Function, ICmp, Immediate, InstId, InstKind, Module, Terminator, Value, ValueId,
};
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::time::{SystemTime, UNIX_EPOCH};
use toroid_data_structures::index::IndexVec;

/// An error that stops execution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecError {
    #[error("out of fuel after {0} steps")]
    OutOfFuel(u64),
    #[error("out-of-bounds memory access in `{block}`: cell {offset} of {len}")]
    OutOfBounds { block: String, offset: i64, len: usize },
    #[error("division by zero in `{block}`")]
    DivisionByZero { block: String },
    #[error("call to unknown function `{0}`")]
    UnknownCallee(String),
    #[error("module has no `main` function")]
    MissingEntry,
    #[error("reached unreachable code in `{0}`")]
    Unreachable(String),
    #[error("malformed program: {0}")]
    Malformed(String),
}

/// Source of the values returned by `random()`.
pub trait RandomSource {
    /// Reseeds the source; called by `srandom`.
    fn seed(&mut self, seed: u32);

    /// Returns the next value of `random()`.
    fn next_random(&mut self) -> i64;
}

/// The default [`RandomSource`], backed by [`StdRng`].
///
/// Like C's `random()`, values are in `0..2^31`.
#[derive(Clone, Debug)]
pub struct StdRandom(StdRng);

impl StdRandom {
    /// Creates a source with a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for StdRandom {
    /// Seeds from the wall clock.
    fn default() -> Self {
        Self::seeded(wall_clock() as u64)
    }
}

impl RandomSource for StdRandom {
    fn seed(&mut self, seed: u32) {
        self.0 = StdRng::seed_from_u64(u64::from(seed));
    }

    fn next_random(&mut self) -> i64 {
        i64::from(self.0.next_u32() >> 1)
    }
}

fn wall_clock() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs() as i64)
}

/// A runtime value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Val {
    Int(i64),
    Ptr { alloc: usize, offset: i64 },
    Null,
    Void,
}

/// Executes a MIR module.
#[derive(derive_more::Debug)]
pub struct Interpreter<'m> {
    #[debug(skip)]
    module: &'m Module,
    #[debug(skip)]
    random: Box<dyn RandomSource + 'm>,
    fuel: Option<u64>,
    clock: Option<i64>,
    steps: u64,
    output: Vec<u8>,
}

impl<'m> Interpreter<'m> {
    /// Creates a new interpreter with unlimited fuel and the default random source.
    pub fn new(module: &'m Module) -> Self {
        Self {
            module,
            random: Box::new(StdRandom::default()),
            fuel: None,
            clock: None,
            steps: 0,
            output: Vec::new(),
        }
    }

    /// Limits the number of instructions and terminators executed.
    pub fn with_fuel(mut self, fuel: u64) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Sets the random source.
    pub fn with_random(mut self, random: impl RandomSource + 'm) -> Self {
        self.random = Box::new(random);
        self
    }

    /// Fixes the value returned by `time()`.
    pub fn with_clock(mut self, now: i64) -> Self {
        self.clock = Some(now);
        self
    }

    /// Returns the bytes written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Consumes the interpreter, returning the bytes written.
    pub fn into_output(self) -> Vec<u8> {
        self.output
    }

    /// Returns the number of steps executed.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Runs `main` to completion and returns its exit status.
    ///
    /// Output written before an error is kept.
    #[instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> Result<i32, ExecError> {
        let module = self.module;
        let func = module.function_by_name("main").ok_or(ExecError::MissingEntry)?;
        let mut frame = Frame::new(func);
        let mut block_id = func.entry_block;
        let status = loop {
            let block = func.block(block_id);
            for &inst in &block.instructions {
                self.tick()?;
                let value = self.eval(&mut frame, block_id, inst)?;
                frame.values[inst] = Some(value);
            }

            self.tick()?;
            block_id = match block.terminator() {
                Some(Terminator::Jump(target)) => *target,
                Some(Terminator::Branch { condition, then_block, else_block }) => {
                    if frame.int(*condition)? != 0 { *then_block } else { *else_block }
                }
                Some(Terminator::Switch { value, default, cases }) => {
                    let value = frame.int(*value)?;
                    let mut target = *default;
                    for &(case, block) in cases {
                        if frame.int(case)? == value {
                            target = block;
                            break;
                        }
                    }
                    target
                }
                Some(Terminator::Return(value)) => {
                    break match value {
                        Some(value) => frame.int(*value)? as i32,
                        None => 0,
                    };
                }
                Some(Terminator::Unreachable) => {
                    return Err(ExecError::Unreachable(block.name.clone()));
                }
                None => {
                    return Err(ExecError::Malformed(format!(
                        "block `{}` has no terminator",
                        block.name
                    )));
                }
            };
        };
        debug!(steps = self.steps, output = self.output.len(), status, "finished");
        Ok(status)
    }

    fn tick(&mut self) -> Result<(), ExecError> {
        self.steps += 1;
        match self.fuel {
            Some(fuel) if self.steps > fuel => Err(ExecError::OutOfFuel(fuel)),
            _ => Ok(()),
        }
    }

    fn eval(
        &mut self,
        frame: &mut Frame<'_>,
        block: BlockId,
        id: InstId,
    ) -> Result<Val, ExecError> {
        let (module, func) = (self.module, frame.func);
        let block_name = || func.block(block).name.clone();
        let inst = func.instruction(id);
        let value = match &inst.kind {
            InstKind::Alloca(ty) => {
                frame.memory.push(vec![0; ty.cells() as usize]);
                Val::Ptr { alloc: frame.memory.len() - 1, offset: 0 }
            }
            InstKind::Load(_, ptr) => {
                let cell = frame.cell(*ptr, block_name)?;
                Val::Int(*cell)
            }
            InstKind::Store(value, ptr) => {
                let value = frame.int(*value)?;
                *frame.cell(*ptr, block_name)? = value;
                Val::Void
            }
            InstKind::ElementPtr(_, base, index) => match frame.get(*base)? {
                Val::Ptr { alloc, offset } => {
                    let index = frame.int(*index)?;
                    Val::Ptr { alloc, offset: offset.wrapping_add(index) }
                }
                other => return Err(ExecError::Malformed(format!("gep on {other:?}"))),
            },
            InstKind::Add(a, b) => Val::Int(frame.int(*a)?.wrapping_add(frame.int(*b)?)),
            InstKind::Sub(a, b) => Val::Int(frame.int(*a)?.wrapping_sub(frame.int(*b)?)),
            InstKind::Mul(a, b) => Val::Int(frame.int(*a)?.wrapping_mul(frame.int(*b)?)),
            InstKind::SDiv(a, b) | InstKind::SRem(a, b) => {
                let (a, b) = (frame.int(*a)?, frame.int(*b)?);
                if b == 0 {
                    return Err(ExecError::DivisionByZero { block: block_name() });
                }
                match inst.kind {
                    InstKind::SDiv(..) => Val::Int(a.wrapping_div(b)),
                    _ => Val::Int(a.wrapping_rem(b)),
                }
            }
            InstKind::ICmp(pred, a, b) => {
                Val::Int(i64::from(ICmp::eval(*pred, frame.int(*a)?, frame.int(*b)?)))
            }
            InstKind::ZExt(value, _) => {
                let bits = func.value_ty(*value).int_bits().unwrap_or(64);
                let value = frame.int(*value)?;
                Val::Int(if bits >= 64 { value } else { value & ((1 << bits) - 1) })
            }
            InstKind::Trunc(value, ty) => {
                let bits = u32::from(ty.int_bits().unwrap_or(64));
                let value = frame.int(*value)?;
                Val::Int(if bits >= 64 { value } else { (value << (64 - bits)) >> (64 - bits) })
            }
            InstKind::Call(callee, args) => {
                let name = module.extern_fn(*callee).name.as_str();
                let arg = |i: usize| match args.get(i) {
                    Some(&arg) => frame.int(arg),
                    None => Err(ExecError::Malformed(format!("missing argument to `{name}`"))),
                };
                match name {
                    "putchar" => {
                        let byte = arg(0)? as u8;
                        self.output.push(byte);
                        Val::Int(i64::from(byte))
                    }
                    "srandom" => {
                        self.random.seed(arg(0)? as u32);
                        Val::Void
                    }
                    "random" => Val::Int(self.random.next_random()),
                    "time" => Val::Int(self.clock.unwrap_or_else(wall_clock)),
                    _ => return Err(ExecError::UnknownCallee(name.to_string())),
                }
            }
        };
        Ok(value)
    }
}

/// The state of one activation of a function.
struct Frame<'f> {
    func: &'f Function,
    values: IndexVec<InstId, Option<Val>>,
    memory: Vec<Vec<i64>>,
}

impl<'f> Frame<'f> {
    fn new(func: &'f Function) -> Self {
        Self {
            func,
            values: IndexVec::from_vec(vec![None; func.instructions.len()]),
            memory: Vec::new(),
        }
    }

    fn get(&self, id: ValueId) -> Result<Val, ExecError> {
        match self.func.value(id) {
            Value::Immediate(Immediate::Int(value, _)) => Ok(Val::Int(*value)),
            Value::Immediate(Immediate::Null) => Ok(Val::Null),
            Value::Inst(inst) => self.values[*inst].ok_or_else(|| {
                ExecError::Malformed(format!("v{} used before definition", id.index()))
            }),
        }
    }

    fn int(&self, id: ValueId) -> Result<i64, ExecError> {
        match self.get(id)? {
            Val::Int(value) => Ok(value),
            other => Err(ExecError::Malformed(format!("expected integer, found {other:?}"))),
        }
    }

    fn cell(
        &mut self,
        ptr: ValueId,
        block_name: impl FnOnce() -> String,
    ) -> Result<&mut i64, ExecError> {
        let Val::Ptr { alloc, offset } = self.get(ptr)? else {
            return Err(ExecError::Malformed(format!("v{} is not a pointer", ptr.index())));
        };
        let memory = &mut self.memory[alloc];
        let len = memory.len();
        usize::try_from(offset)
            .ok()
            .and_then(|offset| memory.get_mut(offset))
            .ok_or_else(|| ExecError::OutOfBounds { block: block_name(), offset, len })
    }
}
