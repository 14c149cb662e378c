use cairo::{Context, Error, TextExtents};

/// A trait to add the `show_text_align` method to the [`Context`] type.
pub trait ShowTextAlign {
    /// Shows the given text at the given `(x, y)` position, with the given alignment. Returns the
    /// extents of the text.
    ///
    /// By default, cairo renders text with the bottom left corner of the text at the given point.
    /// The alignment is a pair of values between `0.0` and `1.0` giving the horizontal and
    /// vertical alignment point of the text: `(0.0, 0.0)` is the bottom left corner, `(0.5, 0.5)`
    /// centers the text, and `(1.0, 1.0)` is the top right corner.
    fn show_text_align(
        &self,
        text: &str,
        point: (f64, f64),
        align: (f64, f64),
    ) -> Result<TextExtents, Error>;
}

impl ShowTextAlign for Context {
    fn show_text_align(
        &self,
        text: &str,
        (x, y): (f64, f64),
        align: (f64, f64),
    ) -> Result<TextExtents, Error> {
        let extents = self.text_extents(text)?;
        self.move_to(x - extents.width() * align.0, y + extents.height() * align.1);
        self.show_text(text)?;
        Ok(extents)
    }
}
