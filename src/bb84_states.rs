use std::fmt;
use std::ops::Index;

/// A classical bit carried by a key, a basis choice or a measurement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn is_one(self) -> bool {
        self == Bit::One
    }

    pub fn complement(self) -> Self {
        match self {
            Bit::Zero => Bit::One,
            Bit::One => Bit::Zero,
        }
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl From<Bit> for bool {
    fn from(bit: Bit) -> Self {
        bit.is_one()
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bit::Zero => write!(f, "0"),
            Bit::One => write!(f, "1"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MeasurementBasis {
    /// Rectilinear basis (|0> and |1>)
    Standard,
    /// Diagonal basis (|+> and |->)
    Hadamard,
}

impl MeasurementBasis {
    pub fn complement(self) -> Self {
        match self {
            MeasurementBasis::Standard => MeasurementBasis::Hadamard,
            MeasurementBasis::Hadamard => MeasurementBasis::Standard,
        }
    }

    /// Numeric label used in reports: 0 = Standard, 1 = Hadamard.
    pub fn as_bit(self) -> Bit {
        match self {
            MeasurementBasis::Standard => Bit::Zero,
            MeasurementBasis::Hadamard => Bit::One,
        }
    }
}

impl From<Bit> for MeasurementBasis {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => MeasurementBasis::Standard,
            Bit::One => MeasurementBasis::Hadamard,
        }
    }
}

impl fmt::Display for MeasurementBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementBasis::Standard => write!(f, "Standard"),
            MeasurementBasis::Hadamard => write!(f, "Hadamard"),
        }
    }
}

pub type Basis = MeasurementBasis;

/// One entry in a qubit's operation log.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Basis rotation (Hadamard gate).
    Rotate,
    /// Bit flip (X gate).
    Flip,
    /// Measurement marker. Carries no outcome.
    Measure,
}

impl Operation {
    fn symbol(self) -> char {
        match self {
            Operation::Rotate => 'H',
            Operation::Flip => 'X',
            Operation::Measure => 'M',
        }
    }
}

/// A transmitted qubit, represented by the ordered log of operations applied
/// to it since preparation in |0>.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qubit {
    operations: Vec<Operation>,
}

impl Qubit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn rotate(&mut self) {
        self.operations.push(Operation::Rotate);
    }

    pub fn flip(&mut self) {
        self.operations.push(Operation::Flip);
    }

    pub fn mark_measured(&mut self) {
        self.operations.push(Operation::Measure);
    }

    pub fn count(&self, op: Operation) -> usize {
        self.operations.iter().filter(|&&o| o == op).count()
    }
}

impl fmt::Display for Qubit {
    /// Renders the log as a one-line circuit, e.g. `|0>─H─X─M─`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|0>─")?;
        for op in &self.operations {
            write!(f, "{}─", op.symbol())?;
        }
        Ok(())
    }
}

/// Qubits in transmission order, index-aligned with the sender's key.
///
/// Stages mutate individual qubits through `iter_mut` but can never add,
/// drop or reorder them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QubitSequence {
    qubits: Vec<Qubit>,
}

impl QubitSequence {
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Qubit> {
        self.qubits.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Qubit> {
        self.qubits.iter_mut()
    }
}

impl FromIterator<Qubit> for QubitSequence {
    fn from_iter<I: IntoIterator<Item = Qubit>>(iter: I) -> Self {
        Self {
            qubits: iter.into_iter().collect(),
        }
    }
}

impl Index<usize> for QubitSequence {
    type Output = Qubit;

    fn index(&self, index: usize) -> &Qubit {
        &self.qubits[index]
    }
}

/// Formats a sequence of bit-like values as `[1 0 1 1 0]`.
pub struct BitString<'a, T>(pub &'a [T]);

impl<T: fmt::Display> fmt::Display for BitString<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

/// Shorthand for building bit vectors from 0/1 literals.
pub fn bits(values: &[u8]) -> Vec<Bit> {
    values.iter().map(|&v| Bit::from(v != 0)).collect()
}
