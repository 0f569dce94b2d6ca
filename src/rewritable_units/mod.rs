use std::any::Any;

pub use self::document::{DocumentEnd, DocumentStart};
pub use self::element::{Element, TagNameError};
pub use self::mutations::ContentType;
pub use self::tokens::*;

pub(crate) use self::element::PendingEndTag;
pub(crate) use self::mutations::Mutations;

/// Arbitrary data attached to a rewritable unit by a handler.
///
/// The data lives as long as the unit itself, so it can be used to pass
/// information between handlers invoked for the same unit.
pub trait UserData {
    /// Returns a reference to the attached user data.
    fn user_data(&self) -> &dyn Any;

    /// Returns a mutable reference to the attached user data.
    fn user_data_mut(&mut self) -> &mut dyn Any;

    /// Attaches user data to the rewritable unit.
    fn set_user_data(&mut self, data: impl Any);
}

macro_rules! impl_user_data {
    ($Unit:ident<$($lt:lifetime),+>) => {
        impl crate::rewritable_units::UserData for $Unit<$($lt),+> {
            #[inline]
            fn user_data(&self) -> &dyn Any {
                &*self.user_data
            }

            #[inline]
            fn user_data_mut(&mut self) -> &mut dyn Any {
                &mut *self.user_data
            }

            #[inline]
            fn set_user_data(&mut self, data: impl Any) {
                self.user_data = Box::new(data);
            }
        }
    };
}

macro_rules! impl_stop_propagation {
    ($Unit:ident<$($lt:lifetime),+>) => {
        impl $Unit<$($lt),+> {
            /// Prevents the handlers that are registered after the current
            /// one from being invoked for this unit.
            ///
            /// Changes that have already been made to the unit are preserved.
            #[inline]
            pub fn stop_propagation(&mut self) {
                self.propagation_stopped = true;
            }

            #[inline]
            pub(crate) fn propagation_stopped(&self) -> bool {
                self.propagation_stopped
            }
        }
    };
}

pub(crate) trait Serialize {
    fn to_bytes(&self, output_handler: &mut dyn FnMut(&[u8]));
}

macro_rules! impl_serialize {
    ($Token:ident) => {
        impl crate::rewritable_units::Serialize for $Token<'_> {
            #[inline]
            fn to_bytes(&self, output_handler: &mut dyn FnMut(&[u8])) {
                let mutations = &self.mutations;

                if !mutations.content_before.is_empty() {
                    output_handler(&mutations.content_before);
                }

                if !mutations.removed {
                    match self.raw() {
                        Some(raw) => output_handler(raw),
                        None => self.serialize_from_parts(output_handler),
                    }
                } else if !mutations.replacement.is_empty() {
                    output_handler(&mutations.replacement);
                }

                if !mutations.content_after.is_empty() {
                    output_handler(&mutations.content_after);
                }
            }
        }
    };
}

#[macro_use]
mod mutations;

mod document;
mod element;
mod tokens;

#[cfg(test)]
mod test_utils {
    use crate::test_utils::Output;
    use crate::*;
    use encoding_rs::Encoding;

    pub fn rewrite_html(
        html: &[u8],
        encoding: &'static Encoding,
        element_content_handlers: Vec<(&str, ElementContentHandlers<'_>)>,
        document_content_handlers: Vec<DocumentContentHandlers<'_>>,
    ) -> String {
        let mut output = Output::new(encoding);

        {
            let mut rewriter = HtmlRewriter::new(
                Settings {
                    document_content_handlers,
                    encoding: AsciiCompatibleEncoding::new(encoding).unwrap(),
                    ..Settings::new()
                },
                |c: &[u8]| output.push(c),
            );

            for (selector, handlers) in element_content_handlers {
                rewriter.on(selector, handlers).unwrap();
            }

            rewriter.write(html).unwrap();
            rewriter.end().unwrap();
        }

        output.into()
    }
}
