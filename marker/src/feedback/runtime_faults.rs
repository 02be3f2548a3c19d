//! Well-known Java runtime faults and a short hint for each.
//!
//! Membership is a plain substring check on the test runner output. The
//! catalogue is not exhaustive.

pub struct RuntimeFault {
    pub class_name: &'static str,
    pub hint: &'static str,
}

pub const CATALOGUE: &[RuntimeFault] = &[
    RuntimeFault {
        class_name: "java.io.IOException",
        hint: "An IOException occurred: an input or output operation failed or was interrupted.",
    },
    RuntimeFault {
        class_name: "java.io.FileNotFoundException",
        hint: "A FileNotFoundException occurred: a file could not be opened. Check the file name and path.",
    },
    RuntimeFault {
        class_name: "java.lang.ArrayIndexOutOfBoundsException",
        hint: "An ArrayIndexOutOfBoundsException occurred: an array was accessed with an illegal index.",
    },
    RuntimeFault {
        class_name: "java.lang.ClassCastException",
        hint: "A ClassCastException occurred: an object was cast to a type it is not an instance of.",
    },
    RuntimeFault {
        class_name: "java.lang.NegativeArraySizeException",
        hint: "A NegativeArraySizeException occurred: an array was created with a negative size.",
    },
    RuntimeFault {
        class_name: "java.lang.NullPointerException",
        hint: "A NullPointerException occurred: null was used where an object is required.",
    },
    RuntimeFault {
        class_name: "java.lang.OutOfMemoryError",
        hint: "An OutOfMemoryError occurred: your program ran out of memory.",
    },
    RuntimeFault {
        class_name: "java.lang.StackOverflowError",
        hint: "A StackOverflowError occurred: check your recursion for a missing or unreachable base case.",
    },
    RuntimeFault {
        class_name: "java.lang.StringIndexOutOfBoundsException",
        hint: "A StringIndexOutOfBoundsException occurred: a string was accessed with an illegal index.",
    },
    RuntimeFault {
        class_name: "java.nio.BufferOverflowException",
        hint: "A BufferOverflowException occurred: a write went past the limit of a buffer.",
    },
    RuntimeFault {
        class_name: "java.nio.BufferUnderflowException",
        hint: "A BufferUnderflowException occurred: a read went past the limit of a buffer.",
    },
    RuntimeFault {
        class_name: "java.security.AccessControlException",
        hint: "An AccessControlException occurred: your code tried an operation that is not permitted here.",
    },
];

/// Catalogue entries mentioned in `output`, in catalogue order.
pub fn detect(output: &str) -> Vec<&'static RuntimeFault> {
    CATALOGUE
        .iter()
        .filter(|fault| output.contains(fault.class_name))
        .collect()
}
