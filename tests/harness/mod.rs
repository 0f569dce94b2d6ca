use encoding_rs::*;
use html_rewriter::{AsciiCompatibleEncoding, HtmlRewriter, RewritingError, Settings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;

pub static ASCII_COMPATIBLE_ENCODINGS: [&Encoding; 36] = [
    &BIG5_INIT,
    &EUC_JP_INIT,
    &EUC_KR_INIT,
    &GB18030_INIT,
    &GBK_INIT,
    &IBM866_INIT,
    &ISO_8859_2_INIT,
    &ISO_8859_3_INIT,
    &ISO_8859_4_INIT,
    &ISO_8859_5_INIT,
    &ISO_8859_6_INIT,
    &ISO_8859_7_INIT,
    &ISO_8859_8_INIT,
    &ISO_8859_8_I_INIT,
    &ISO_8859_10_INIT,
    &ISO_8859_13_INIT,
    &ISO_8859_14_INIT,
    &ISO_8859_15_INIT,
    &ISO_8859_16_INIT,
    &KOI8_R_INIT,
    &KOI8_U_INIT,
    &MACINTOSH_INIT,
    &SHIFT_JIS_INIT,
    &UTF_8_INIT,
    &WINDOWS_874_INIT,
    &WINDOWS_1250_INIT,
    &WINDOWS_1251_INIT,
    &WINDOWS_1252_INIT,
    &WINDOWS_1253_INIT,
    &WINDOWS_1254_INIT,
    &WINDOWS_1255_INIT,
    &WINDOWS_1256_INIT,
    &WINDOWS_1257_INIT,
    &WINDOWS_1258_INIT,
    &X_MAC_CYRILLIC_INIT,
    &X_USER_DEFINED_INIT,
];

pub const PAGE: &str = include_str!("../data/page.html");

/// Input encoded in one of the ASCII-compatible encodings and split into chunks.
#[derive(Debug, Clone)]
pub struct Input {
    bytes: Vec<u8>,
    encoding: &'static Encoding,
}

impl Input {
    /// Returns `None` if the input can't be represented in the encoding.
    pub fn new(input: &str, encoding: &'static Encoding) -> Option<Self> {
        let (bytes, _, had_unmappable_chars) = encoding.encode(input);

        // NOTE: some encodings deviate from ASCII, e.g. in Shift_JIS the yen sign (U+00A5)
        // is mapped to 0x5C, which makes conversion from UTF-8 non-roundtrippable even
        // without replacements inserted by the encoder.
        if had_unmappable_chars || encoding.decode_without_bom_handling(&bytes).0 != input {
            return None;
        }

        Some(Input {
            bytes: bytes.into_owned(),
            encoding,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Chunk size taken from the `CHUNK_SIZE` environment variable or picked at random.
    pub fn random_chunk_size(&self, rng: &mut StdRng) -> usize {
        match env::var("CHUNK_SIZE") {
            Ok(val) => val.parse().unwrap(),
            Err(_) if self.len() > 1 => rng.gen_range(1..self.len()),
            Err(_) => 1,
        }
    }

    pub fn chunks(&self, chunk_size: usize) -> impl Iterator<Item = &[u8]> {
        self.bytes.chunks(chunk_size.max(1))
    }
}

pub fn seeded_rng() -> StdRng {
    let seed = env::var("SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);

    StdRng::seed_from_u64(seed)
}

/// Output accumulator that checks that the rewriter never emits empty chunks.
pub struct Output {
    bytes: Vec<u8>,
    chunk_count: usize,
    encoding: &'static Encoding,
}

impl Output {
    pub fn new(encoding: &'static Encoding) -> Self {
        Output {
            bytes: Vec::default(),
            chunk_count: 0,
            encoding,
        }
    }

    pub fn push(&mut self, chunk: &[u8]) {
        assert!(!chunk.is_empty(), "Empty chunk has been passed to the output sink");

        self.chunk_count += 1;
        self.bytes.extend_from_slice(chunk);
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }
}

impl From<Output> for String {
    fn from(output: Output) -> String {
        output
            .encoding
            .decode_without_bom_handling(&output.bytes)
            .0
            .into_owned()
    }
}

/// Rewrites the input split into chunks of `chunk_size` bytes.
pub fn rewrite_chunked(
    input: &Input,
    chunk_size: usize,
    settings: Settings<'_, '_>,
) -> Result<Output, RewritingError> {
    let mut output = Output::new(input.encoding());

    {
        let mut rewriter = HtmlRewriter::new(
            Settings {
                encoding: AsciiCompatibleEncoding::new(input.encoding()).unwrap(),
                ..settings
            },
            |c: &[u8]| output.push(c),
        );

        for chunk in input.chunks(chunk_size) {
            rewriter.write(chunk)?;
        }

        rewriter.end()?;
    }

    Ok(output)
}

/// Rewrites the UTF-8 input written in the given chunks.
pub fn rewrite_parts(parts: &[&str], settings: Settings<'_, '_>) -> String {
    let mut output = Output::new(UTF_8);

    {
        let mut rewriter = HtmlRewriter::new(settings, |c: &[u8]| output.push(c));

        for part in parts {
            rewriter.write(part.as_bytes()).unwrap();
        }

        rewriter.end().unwrap();
    }

    output.into()
}

/// Runs the `check` for the input in every encoding that can represent it,
/// with a random chunk size.
macro_rules! for_each_encoding_and_chunk_size {
    ($input:expr, |$i:ident, $chunk_size:ident| $check:block) => {{
        let mut rng = $crate::harness::seeded_rng();

        for &encoding in $crate::harness::ASCII_COMPATIBLE_ENCODINGS.iter() {
            if let Some($i) = $crate::harness::Input::new($input, encoding) {
                let $chunk_size = $i.random_chunk_size(&mut rng);

                $check
            }
        }
    }};
}
