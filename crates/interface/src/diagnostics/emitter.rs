//! Diagnostic emitters.

use super::{Diag, Level};
use crate::SourceFile;
use annotate_snippets::{
    Annotation, AnnotationKind, Group, Level as ASLevel, Renderer, Snippet, Title,
};
use anstream::{AutoStream, ColorChoice};
use std::{
    io::{self, Write},
    sync::{Arc, Mutex, OnceLock},
};

type Writer = dyn Write + Send + 'static;

/// Dynamic diagnostic emitter. See [`Emitter`].
pub type DynEmitter = dyn Emitter + Send;

/// Diagnostic emitter.
pub trait Emitter {
    /// Emits a diagnostic.
    fn emit_diagnostic(&mut self, diag: &Diag);

    /// Returns `true` if we can use colors in the current output stream.
    fn supports_color(&self) -> bool {
        false
    }
}

/// Diagnostic emitter that only counts, never prints.
pub struct SilentEmitter;

impl Emitter for SilentEmitter {
    fn emit_diagnostic(&mut self, _diag: &Diag) {}
}

/// An in-memory diagnostics emitter.
///
/// Diagnostics are pushed to a shared buffer as-is.
pub struct InMemoryEmitter {
    buffer: Arc<Mutex<Vec<Diag>>>,
}

impl InMemoryEmitter {
    /// Creates a new emitter, returning the emitter itself and the buffer.
    pub fn new() -> (Self, Arc<Mutex<Vec<Diag>>>) {
        let buffer = Arc::<Mutex<Vec<Diag>>>::default();
        (Self { buffer: Arc::clone(&buffer) }, buffer)
    }
}

impl Emitter for InMemoryEmitter {
    fn emit_diagnostic(&mut self, diag: &Diag) {
        self.buffer.lock().unwrap_or_else(|e| e.into_inner()).push(diag.clone());
    }
}

/// Diagnostic emitter that emits to an arbitrary [`io::Write`] writer in human-readable format.
///
/// When a source file is attached, diagnostics pointing at a cell show the offending row of the
/// program with the cell underlined.
pub struct HumanEmitter {
    writer: AutoStream<Box<Writer>>,
    source: Option<Arc<SourceFile>>,
    renderer: Renderer,
}

impl Emitter for HumanEmitter {
    fn emit_diagnostic(&mut self, diag: &Diag) {
        let rendered = self.render(diag);
        if let Err(e) = emit_to_destination(&rendered, &mut self.writer) {
            panic!("failed to emit diagnostic: {e}");
        }
    }

    fn supports_color(&self) -> bool {
        match self.writer.current_choice() {
            ColorChoice::AlwaysAnsi | ColorChoice::Always => true,
            ColorChoice::Auto | ColorChoice::Never => false,
        }
    }
}

impl HumanEmitter {
    /// Creates a new `HumanEmitter` that writes to given writer.
    ///
    /// Note that a color choice of `Auto` will be treated as `Never` because the writer is opaque
    /// at this point.
    pub fn new<W: Write + Send + 'static>(writer: W, color: ColorChoice) -> Self {
        let writer = AutoStream::new(Box::new(writer) as Box<Writer>, color);
        let mut this = Self { writer, source: None, renderer: Renderer::plain() };
        if this.supports_color() {
            this.renderer = Renderer::styled();
        }
        this
    }

    /// Creates a new `HumanEmitter` that writes to stderr.
    pub fn stderr(color: ColorChoice) -> Self {
        // `io::Stderr` is not buffered.
        Self::new(io::BufWriter::new(io::stderr()), stderr_choice(color))
    }

    /// Sets the source file that positions refer to.
    pub fn source(mut self, source: Option<Arc<SourceFile>>) -> Self {
        self.source = source;
        self
    }

    /// Renders `diag` to a string without writing it.
    pub fn render(&self, diag: &Diag) -> String {
        let mut group = Group::with_title(title(diag));
        if let Some(snippet) = self.snippet(diag) {
            group = group.element(snippet);
        }
        for child in &diag.children {
            group = group.element(annotation_level(child.level).message(child.msg.as_str()));
        }
        self.renderer.render(&[group])
    }

    /// Returns the source row `diag` points at, with the cell annotated.
    fn snippet<'a>(&'a self, diag: &'a Diag) -> Option<Snippet<'a, Annotation<'a>>> {
        let pos = diag.pos?;
        let file = self.source.as_deref()?;
        let Some(line) = file.line(pos.y) else {
            debug!(%pos, "diagnostic points past the end of the source");
            return None;
        };
        // Cells are characters; annotations are byte ranges. Cells past the end of the row are
        // padding and point just after the last character.
        let lo = char_to_byte_pos(line, pos.x);
        let hi = line[lo..].chars().next().map_or(lo, |c| lo + c.len_utf8());
        let annotation = AnnotationKind::Primary.span(lo..hi).label(diag.label.clone());
        Some(
            Snippet::source(line)
                .line_start(pos.y + 1)
                .path(file.name.to_string())
                .annotation(annotation),
        )
    }
}

fn title(diag: &Diag) -> Title<'_> {
    annotation_level(diag.level).primary_title(diag.msg.as_str())
}

fn annotation_level(level: Level) -> ASLevel<'static> {
    match level {
        Level::Error => ASLevel::ERROR,
        Level::Warning => ASLevel::WARNING,
        Level::Note => ASLevel::NOTE,
        Level::Help => ASLevel::HELP,
    }
}

fn char_to_byte_pos(s: &str, char_pos: usize) -> usize {
    s.chars().take(char_pos).map(char::len_utf8).sum()
}

fn stderr_choice(color_choice: ColorChoice) -> ColorChoice {
    static AUTO: OnceLock<ColorChoice> = OnceLock::new();
    if color_choice == ColorChoice::Auto {
        *AUTO.get_or_init(|| AutoStream::choice(&io::stderr()))
    } else {
        color_choice
    }
}

fn emit_to_destination(rendered: &str, dst: &mut impl Write) -> io::Result<()> {
    writeln!(dst, "{rendered}")?;
    writeln!(dst)?;
    dst.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pos;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn emitter(src: &str) -> HumanEmitter {
        HumanEmitter::new(io::sink(), ColorChoice::Never)
            .source(Some(Arc::new(SourceFile::new("prog.bf", src))))
    }

    #[test]
    fn renders_offending_cell() {
        let diag = Diag::error("disallowed instruction `p`")
            .pos_label(Pos::new(2, 1), "self-modification is not supported")
            .note("the grid is compiled ahead of time");
        let out = emitter("v\n12p@").render(&diag);
        assert!(out.contains("error: disallowed instruction `p`"), "{out}");
        assert!(out.contains("prog.bf:2:3"), "{out}");
        assert!(out.contains("12p@"), "{out}");
        assert!(out.contains("^ self-modification is not supported"), "{out}");
        assert!(out.contains("note: the grid is compiled ahead of time"), "{out}");
        assert!(!out.contains('\x1b'), "{out:?}");
    }

    #[test]
    fn multibyte_row() {
        let diag = Diag::error("unsupported instruction `&`").pos(Pos::new(2, 0));
        let out = emitter("éé&@").render(&diag);
        assert!(out.contains("prog.bf:1:3"), "{out}");
    }

    #[test]
    fn without_position() {
        let out = emitter("@").render(&Diag::error("couldn't read stdin"));
        assert!(out.contains("error: couldn't read stdin"), "{out}");
        assert!(!out.contains("prog.bf"), "{out}");

        let diag = Diag::error("past the end").pos(Pos::new(0, 10));
        let out = emitter("@").render(&diag);
        assert!(!out.contains("prog.bf"), "{out}");
    }

    #[test]
    fn writes_to_destination() {
        let buf = SharedBuf::default();
        let mut emitter = HumanEmitter::new(buf.clone(), ColorChoice::Never);
        assert!(!emitter.supports_color());
        emitter.emit_diagnostic(&Diag::warning("1 warning emitted"));
        let written = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(written.starts_with("warning: 1 warning emitted"), "{written}");
        assert!(written.ends_with("\n\n"), "{written:?}");
    }
}
