// ============================================================================
// Basic Usage Example
// ============================================================================

use hdl_fixed::prelude::*;
use std::sync::Arc;

fn main() -> Result<(), FixedError> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Fixed-Point Example ===\n");

    // Q3.7 signed: 11 bits including sign
    let format: FixedFormat = "(True,3,7)".parse()?;
    println!("Format {} spans {:?}", format, format.range());
    println!(
        "  bounds: {} .. {}\n",
        format.min_as(Radix::Hex),
        format.max_as(Radix::Hex)
    );

    // Quantize stimulus samples
    let stimulus = FixedValue::new(
        vec![0.0078125, 7.724, -3.72455, -7.0, 0.0, -8.0],
        format,
        RoundingMode::SymZero,
        OverflowMode::Wrap,
    )?;
    println!("Stimulus:\n{}\n", stimulus);

    println!("Bit patterns:");
    for ((int, hex), bin) in stimulus
        .intfmt()
        .iter()
        .zip(stimulus.hexfmt().iter())
        .zip(stimulus.binfmt().iter())
    {
        println!("  {:>5}  {}  {}", int, hex, bin);
    }

    // Rebuild from the patterns, as a test bench reader would
    let restored = FixedValue::from_int_repr(stimulus.intfmt(), format.tuple())?;
    println!("\nRestored matches: {}", restored.data() == stimulus.data());

    // Arithmetic through a unit that reports mode mismatches
    println!("\n=== Multiply-Accumulate ===");
    let unit = ArithmeticUnitBuilder::new("mac")
        .inherit_modes()
        .build(Arc::new(LoggingDiagnostics))?;

    let coeffs = FixedValue::new(
        vec![0.125, -0.375, 0.5, -0.375, 0.125],
        FixedFormat::new(true, 0, 7)?,
        RoundingMode::ConvEven,
        OverflowMode::Sat,
    )?;
    let taps = FixedValue::with_defaults(vec![1.5, -2.25, 3.0, 0.75, -1.0], FixedFormat::new(true, 3, 2)?)?;

    let products = unit.mul(&coeffs, &taps)?;
    println!("Products in {}: {:?}", products.format(), products.data());

    let mut acc = products.get(&[0])?;
    for product in products.iter().skip(1) {
        acc = unit.add(&acc, &product)?;
    }
    println!("Accumulator in {}: {:?}", acc.format(), acc.data());

    // Narrow to the output register
    let output = acc.cast(FixedFormat::new(true, 1, 6)?, FixedMath::saturating());
    println!("Output register {}: {:?}", output.format(), output.data());
    println!("  as {}", output.binfmt()[0]);

    println!("\nOperations performed: {}", unit.operation_count());
    Ok(())
}
