mod error;
mod handlers_dispatcher;
mod rewrite_controller;

#[macro_use]
mod settings;

use self::rewrite_controller::*;
use crate::base::AsciiCompatibleEncoding;
use crate::memory::MemoryLimiter;
use crate::selectors_vm::{Selector, SelectorError};
use crate::transform_stream::*;
use cfg_if::cfg_if;
use std::fmt::{self, Debug};
use std::mem;

pub use self::error::*;
pub use self::settings::*;

enum Stage<'h, O: OutputSink> {
    Idle {
        controller: HtmlRewriteController<'h>,
        output_sink: O,
    },
    Streaming(Box<TransformStream<HtmlRewriteController<'h>, O>>),
    Ended,
    Poisoned,
    Freed,
}

cfg_if! {
    if #[cfg(feature = "debug_trace")] {
        impl<O: OutputSink> Debug for Stage<'_, O> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(match self {
                    Stage::Idle { .. } => "Idle",
                    Stage::Streaming(_) => "Streaming",
                    Stage::Ended => "Ended",
                    Stage::Poisoned => "Poisoned",
                    Stage::Freed => "Freed",
                })
            }
        }
    }
}

/// A streaming HTML rewriter.
///
/// The rewriter goes through the following stages:
///
/// * idle: handlers can be registered, no output has been produced yet;
/// * streaming: started either explicitly with [`start`] or by the first call to [`write`];
/// * ended: [`end`] has been called and all the output has been passed to the sink;
/// * freed: [`free`] has been called and all the resources have been released.
///
/// Any error poisons the rewriter: the subsequent calls to [`write`] and [`end`] fail.
///
/// # Example
/// ```
/// use html_rewriter::{element, HtmlRewriter, Settings};
///
/// let mut output = vec![];
///
/// {
///     let mut rewriter = HtmlRewriter::new(
///         Settings {
///             element_content_handlers: vec![
///                 // Rewrite insecure hyperlinks
///                 element!("a[href]", |el| {
///                     let href = el
///                         .get_attribute("href")
///                         .unwrap()
///                         .replace("http:", "https:");
///
///                     el.set_attribute("href", &href).unwrap();
///
///                     Ok(())
///                 })
///             ],
///             ..Settings::new()
///         },
///         |c: &[u8]| output.extend_from_slice(c)
///     );
///
///     rewriter.write(b"<div><a href=").unwrap();
///     rewriter.write(b"http://example.com>").unwrap();
///     rewriter.write(b"</a></div>").unwrap();
///     rewriter.end().unwrap();
/// }
///
/// assert_eq!(
///     String::from_utf8(output).unwrap(),
///     r#"<div><a href="https://example.com"></a></div>"#
/// );
/// ```
///
/// [`start`]: HtmlRewriter::start
/// [`write`]: HtmlRewriter::write
/// [`end`]: HtmlRewriter::end
/// [`free`]: HtmlRewriter::free
pub struct HtmlRewriter<'h, O: OutputSink> {
    stage: Stage<'h, O>,
    encoding: AsciiCompatibleEncoding,
    memory_settings: MemorySettings,
    strict: bool,
    output_buffer_capacity: usize,
}

impl<'h, O: OutputSink> HtmlRewriter<'h, O> {
    /// Constructs a new rewriter with the provided `settings` that writes
    /// the output to the `output_sink`.
    ///
    /// # Note
    ///
    /// For the convenience the [`OutputSink`] trait is implemented for closures.
    ///
    /// [`OutputSink`]: trait.OutputSink.html
    pub fn new<'s>(settings: Settings<'h, 's>, output_sink: O) -> Self {
        let encoding: &'static encoding_rs::Encoding = settings.encoding.into();
        let mut controller = HtmlRewriteController::new(encoding);

        for (selector, handlers) in settings.element_content_handlers {
            controller.add_element_content_handlers(&selector, handlers);
        }

        for handlers in settings.document_content_handlers {
            controller.add_document_content_handlers(handlers);
        }

        HtmlRewriter {
            stage: Stage::Idle {
                controller,
                output_sink,
            },
            encoding: settings.encoding,
            memory_settings: settings.memory_settings,
            strict: settings.strict,
            output_buffer_capacity: settings.output_buffer_capacity,
        }
    }

    fn set_stage(&mut self, stage: Stage<'h, O>) {
        trace!(@stage self.stage => stage);

        self.stage = stage;
    }

    /// Registers element content handlers for the `selector`.
    ///
    /// The handlers are applied to the content that is written after the
    /// registration. Elements that are already open don't take part in the
    /// matching of the `selector`. Registration after [`end`] has no effect.
    ///
    /// [`end`]: HtmlRewriter::end
    pub fn on(
        &mut self,
        selector: &str,
        handlers: ElementContentHandlers<'h>,
    ) -> Result<(), SelectorError> {
        let selector: Selector = selector.parse()?;

        match &mut self.stage {
            Stage::Idle { controller, .. } => {
                controller.add_element_content_handlers(&selector, handlers);
            }
            Stage::Streaming(stream) => {
                stream
                    .transform_controller_mut()
                    .add_element_content_handlers(&selector, handlers);

                stream.refresh_capture_flags();
            }
            Stage::Ended | Stage::Poisoned | Stage::Freed => (),
        }

        Ok(())
    }

    /// Registers document content handlers.
    ///
    /// The [`start`] handler is ignored if the rewriter has already started.
    ///
    /// [`start`]: DocumentContentHandlers::start
    pub fn on_document(&mut self, handlers: DocumentContentHandlers<'h>) {
        match &mut self.stage {
            Stage::Idle { controller, .. } => {
                controller.add_document_content_handlers(handlers);
            }
            Stage::Streaming(stream) => {
                stream
                    .transform_controller_mut()
                    .add_document_content_handlers(handlers);

                stream.refresh_capture_flags();
            }
            Stage::Ended | Stage::Poisoned | Stage::Freed => (),
        }
    }

    fn start_streaming(&mut self) -> Result<(), RewritingError> {
        let (controller, output_sink) = match mem::replace(&mut self.stage, Stage::Poisoned) {
            Stage::Idle {
                controller,
                output_sink,
            } => (controller, output_sink),
            stage => {
                self.stage = stage;

                return Ok(());
            }
        };

        let mut stream = Box::new(TransformStream::new(TransformStreamSettings {
            transform_controller: controller,
            output_sink,
            preallocated_parsing_buffer_size: self
                .memory_settings
                .preallocated_parsing_buffer_size,
            memory_limiter: MemoryLimiter::new_shared(
                self.memory_settings.max_allowed_memory_usage,
            ),
            encoding: self.encoding.into(),
            strict: self.strict,
            output_buffer_capacity: self.output_buffer_capacity,
        }));

        // NOTE: the stage remains poisoned if any of the start handlers fails.
        stream.start()?;

        self.set_stage(Stage::Streaming(stream));

        Ok(())
    }

    fn stream_mut(
        &mut self,
    ) -> Result<&mut TransformStream<HtmlRewriteController<'h>, O>, RewritingError> {
        if let Stage::Idle { .. } = self.stage {
            self.start_streaming()?;
        }

        match &mut self.stage {
            Stage::Streaming(stream) => Ok(stream.as_mut()),
            Stage::Ended => Err(InvalidStateError::Ended.into()),
            Stage::Freed => Err(InvalidStateError::Freed.into()),
            Stage::Idle { .. } | Stage::Poisoned => Err(InvalidStateError::Poisoned.into()),
        }
    }

    /// Starts the rewriting: invokes the document [`start`] handlers.
    ///
    /// Called implicitly by the first [`write`]. Does nothing if the rewriter
    /// is already streaming.
    ///
    /// [`start`]: DocumentContentHandlers::start
    /// [`write`]: HtmlRewriter::write
    pub fn start(&mut self) -> Result<(), RewritingError> {
        self.stream_mut().map(|_| ())
    }

    /// Writes a chunk of input data to the rewriter.
    ///
    /// # Errors
    /// * If one of the content handlers returns an error, it's propagated as the return value.
    /// * If the internal parsing buffer exceeds [`MemorySettings::max_allowed_memory_usage`],
    ///   [`RewritingError::MemoryLimitExceeded`] is returned.
    /// * If the rewriter has been ended, freed or poisoned, [`RewritingError::InvalidState`]
    ///   is returned.
    ///
    /// The rewriter is poisoned on any of the errors except the invalid state.
    ///
    /// [`MemorySettings::max_allowed_memory_usage`]: MemorySettings::max_allowed_memory_usage
    #[inline]
    pub fn write(&mut self, data: &[u8]) -> Result<(), RewritingError> {
        let result = self.stream_mut()?.write(data);

        if result.is_err() {
            self.set_stage(Stage::Poisoned);
        }

        result
    }

    /// Finalizes the rewriting process.
    ///
    /// Should be called once the last chunk of the input is written. Blocked
    /// input is flushed, the content appended to the elements that were left
    /// open is emitted and the document [`end`] handlers are invoked.
    ///
    /// [`end`]: DocumentContentHandlers::end
    pub fn end(&mut self) -> Result<(), RewritingError> {
        let result = self.stream_mut()?.end();

        // NOTE: dropping the stream releases the parsing buffer and the handlers.
        self.set_stage(if result.is_ok() {
            Stage::Ended
        } else {
            Stage::Poisoned
        });

        result
    }

    /// Releases all the resources held by the rewriter without finishing
    /// the rewriting. Can be called in any stage, any number of times.
    #[inline]
    pub fn free(&mut self) {
        self.set_stage(Stage::Freed);
    }
}

// NOTE: this opaque Debug implementation is required to make
// `.unwrap()` and `.expect()` methods available on Result
// returned by the `HtmlRewriter` constructors.
impl<O: OutputSink> Debug for HtmlRewriter<'_, O> {
    #[cold]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HtmlRewriter")
    }
}

/// Rewrites given `html` string with the provided `settings`.
///
/// # Example
///
/// ```
/// use html_rewriter::{rewrite_str, element, RewriteStrSettings};
///
/// let element_content_handlers = vec![
///     // Rewrite insecure hyperlinks
///     element!("a[href]", |el| {
///         let href = el
///             .get_attribute("href")
///             .unwrap()
///             .replace("http:", "https:");
///
///          el.set_attribute("href", &href).unwrap();
///
///          Ok(())
///     })
/// ];
/// let output = rewrite_str(
///     r#"<div><a href="http://example.com"></a></div>"#,
///     RewriteStrSettings {
///         element_content_handlers,
///         ..RewriteStrSettings::new()
///     }
/// ).unwrap();
///
/// assert_eq!(output, r#"<div><a href="https://example.com"></a></div>"#);
/// ```
pub fn rewrite_str<'h, 's>(
    html: &str,
    settings: impl Into<Settings<'h, 's>>,
) -> Result<String, RewritingError> {
    let mut output = vec![];

    let mut rewriter = HtmlRewriter::new(settings.into(), |c: &[u8]| {
        output.extend_from_slice(c);
    });

    rewriter.write(html.as_bytes())?;
    rewriter.end()?;

    drop(rewriter);

    // NOTE: the input is a valid UTF-8 string and the rewriting is performed
    // in UTF-8, so the conversion only fails on malformed handler output.
    Ok(String::from_utf8(output)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned()))
}
