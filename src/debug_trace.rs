// NOTE: every arm expands to nothing unless the `debug_trace` feature is enabled.
macro_rules! trace {
    ( @write $data:expr ) => {
        #[cfg(feature = "debug_trace")]
        {
            println!("-- Write: {:?}", $crate::base::Bytes::from(&$data[..]));
        }
    };

    ( @end ) => {
        #[cfg(feature = "debug_trace")]
        {
            println!("-- End");
        }
    };

    ( @buffer $buffer:expr ) => {
        #[cfg(feature = "debug_trace")]
        {
            println!("-- Buffered: {:?}", $crate::base::Bytes::from($buffer.bytes()));
        }
    };

    ( @chunk $chunk:expr ) => {
        #[cfg(feature = "debug_trace")]
        {
            println!();
            println!("{:#?}", $chunk);
            println!();
        }
    };

    ( @lexeme $lexeme:expr ) => {
        #[cfg(feature = "debug_trace")]
        {
            println!("@lexeme: {:#?}", $lexeme);
        }
    };

    ( @output $output:expr ) => {
        #[cfg(feature = "debug_trace")]
        {
            println!("@output: {:?}", $crate::base::Bytes::from(&$output[..]));
        }
    };

    ( @stage $from:expr => $to:expr ) => {
        #[cfg(feature = "debug_trace")]
        {
            println!("@stage: {:?} -> {:?}", $from, $to);
        }
    };
}
