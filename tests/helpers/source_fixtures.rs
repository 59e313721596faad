//! Common COBOL sources for tests.

/// Sections and paragraphs in the procedure division
pub const SECTST: &str = "IDENTIFICATION DIVISION.\n PROGRAM-ID. SECTST.\n PROCEDURE DIVISION.\n DISPLAY 'OUT'.\n GO TO PARAG1.\n SECT1 SECTION.\n DISPLAY 'SECT1'.\n PARAG1.\n DISPLAY 'PARAG1'.\n PERFORM PARAG2 OF SECT2.\n SECT2 SECTION.\n PARAG2.\n DISPLAY 'PARAG2'.";

pub const MINIMAL: &str = "ID DIVISION.\nPROGRAM-ID. MINIMAL.\n";

/// Every division, with comment entries and pictures
pub const FULL_PROGRAM: &str = r#"IDENTIFICATION DIVISION.
PROGRAM-ID. PAYROLL IS INITIAL PROGRAM.
AUTHOR. J. SMITH, ACCOUNTING.
DATE-WRITTEN. 2024-01-15.
ENVIRONMENT DIVISION.
CONFIGURATION SECTION.
SOURCE-COMPUTER. IBM-370.
INPUT-OUTPUT SECTION.
FILE-CONTROL.
    SELECT EMP-FILE ASSIGN TO 'EMP.DAT'.
DATA DIVISION.
FILE SECTION.
FD EMP-FILE.
01 EMP-REC PIC X(80).
WORKING-STORAGE SECTION.
01 WS-TOTALS.
   05 WS-COUNT PIC 9(5) VALUE ZERO.
   05 WS-RATE PIC 9V99 VALUE 1.5.
   05 WS-NAME PIC X(20) VALUE SPACES.
PROCEDURE DIVISION.
MAIN-PARA.
    DISPLAY 'START'.
    ADD 1 TO WS-COUNT.
    STOP RUN.
END PROGRAM PAYROLL.
"#;

/// A program nested in another, each closed by its own trailer
pub const NESTED: &str = r#"ID DIVISION.
PROGRAM-ID. OUTER.
PROCEDURE DIVISION.
    DISPLAY 'OUTER'.
ID DIVISION.
PROGRAM-ID. INNER.
PROCEDURE DIVISION.
    DISPLAY 'INNER'.
END PROGRAM INNER.
END PROGRAM OUTER.
"#;

/// Two programs one after the other
pub const SIBLINGS: &str = r#"ID DIVISION.
PROGRAM-ID. FIRST.
PROCEDURE DIVISION.
    GOBACK.
END PROGRAM FIRST.
ID DIVISION.
PROGRAM-ID. SECOND.
PROCEDURE DIVISION.
    GOBACK.
END PROGRAM SECOND.
"#;
