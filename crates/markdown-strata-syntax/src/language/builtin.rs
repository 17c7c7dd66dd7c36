//! The default language table.
//!
//! Each entry pairs a tokenizer with the fence selectors that choose it. The
//! tokenizers here are keyword-level approximations built on
//! [`GenericTokenizer`]; hosts wanting full grammars register their own
//! handles for the same selectors in a fresh registry.

use std::sync::Arc;

use super::registry::LanguageRegistry;
use super::tokenizer::{GenericTokenizer, GenericTokenizerConfig, PlainTokenizer, TokenizerHandle};

enum Builtin {
    Plain,
    Generic(&'static GenericTokenizerConfig),
}

impl Builtin {
    fn handle(&self) -> TokenizerHandle {
        match self {
            Builtin::Plain => Arc::new(PlainTokenizer),
            Builtin::Generic(config) => Arc::new(GenericTokenizer::new(config)),
        }
    }
}

/// Comment and quoting conventions shared by a family of languages.
const fn family(
    name: &'static str,
    keywords: &'static [&'static str],
    types: &'static [&'static str],
    line_comment: &'static str,
    block_comment: (&'static str, &'static str),
    quotes: &'static [u8],
) -> GenericTokenizerConfig {
    GenericTokenizerConfig {
        name,
        keywords,
        types,
        line_comment,
        block_comment,
        quotes,
        case_insensitive: false,
    }
}

const C_COMMENT: (&str, &str) = ("/*", "*/");
const NO_BLOCK: (&str, &str) = ("", "");

const C_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "break", "continue",
    "return", "goto", "sizeof", "typedef", "struct", "union", "enum", "static", "extern",
    "const", "volatile", "inline",
];
const C_TYPES: &[&str] = &[
    "int", "char", "float", "double", "void", "long", "short", "unsigned", "signed", "bool",
    "size_t",
];

static JAVASCRIPT: GenericTokenizerConfig = family(
    "javascript",
    &[
        "var", "let", "const", "function", "return", "if", "else", "for", "while", "do",
        "switch", "case", "break", "continue", "new", "this", "class", "extends", "import",
        "export", "from", "async", "await", "yield", "try", "catch", "finally", "throw",
        "typeof", "instanceof", "of", "in", "null", "undefined",
    ],
    &[],
    "//",
    C_COMMENT,
    b"\"'`",
);
static JSON: GenericTokenizerConfig = family("json", &["null"], &[], "", NO_BLOCK, b"\"");
static TYPESCRIPT: GenericTokenizerConfig = family(
    "typescript",
    &[
        "var", "let", "const", "function", "return", "if", "else", "for", "while", "class",
        "extends", "implements", "interface", "type", "enum", "import", "export", "from",
        "async", "await", "new", "this", "public", "private", "protected", "readonly", "as",
        "null", "undefined",
    ],
    &["string", "number", "boolean", "any", "unknown", "never", "void", "object"],
    "//",
    C_COMMENT,
    b"\"'`",
);
static C: GenericTokenizerConfig = family("c", C_KEYWORDS, C_TYPES, "//", C_COMMENT, b"\"'");
static CPP: GenericTokenizerConfig = family(
    "cpp",
    &[
        "if", "else", "for", "while", "do", "switch", "case", "return", "class", "struct",
        "namespace", "using", "template", "typename", "public", "private", "protected",
        "virtual", "override", "const", "constexpr", "static", "new", "delete", "nullptr",
        "auto", "this",
    ],
    C_TYPES,
    "//",
    C_COMMENT,
    b"\"'",
);
static CSHARP: GenericTokenizerConfig = family(
    "csharp",
    &[
        "using", "namespace", "class", "struct", "interface", "public", "private", "protected",
        "internal", "static", "readonly", "var", "new", "return", "if", "else", "for",
        "foreach", "while", "async", "await", "null", "this",
    ],
    &["int", "string", "bool", "double", "float", "object", "void", "decimal"],
    "//",
    C_COMMENT,
    b"\"'",
);
static CLOJURE: GenericTokenizerConfig = family(
    "clojure",
    &["def", "defn", "fn", "let", "if", "do", "loop", "recur", "ns", "nil"],
    &[],
    ";",
    NO_BLOCK,
    b"\"",
);
static ELM: GenericTokenizerConfig = family(
    "elm",
    &[
        "module", "import", "exposing", "type", "alias", "case", "of", "let", "in", "if", "then",
        "else", "port",
    ],
    &["Int", "Float", "String", "Bool", "List", "Maybe"],
    "--",
    ("{-", "-}"),
    b"\"",
);
static FSHARP: GenericTokenizerConfig = family(
    "fsharp",
    &[
        "let", "mutable", "fun", "match", "with", "type", "module", "open", "if", "then",
        "else", "rec", "in", "member",
    ],
    &["int", "string", "float", "bool", "unit"],
    "//",
    ("(*", "*)"),
    b"\"",
);
static FORTRAN: GenericTokenizerConfig = GenericTokenizerConfig {
    name: "fortran",
    keywords: &[
        "program", "end", "subroutine", "function", "call", "do", "if", "then", "else",
        "module", "use", "implicit", "none", "return",
    ],
    types: &["integer", "real", "character", "logical", "complex"],
    line_comment: "!",
    block_comment: NO_BLOCK,
    quotes: b"\"'",
    case_insensitive: true,
};
static JAVA: GenericTokenizerConfig = family(
    "java",
    &[
        "class", "interface", "extends", "implements", "public", "private", "protected",
        "static", "final", "new", "return", "if", "else", "for", "while", "try", "catch",
        "throw", "throws", "import", "package", "null", "this",
    ],
    &["int", "long", "boolean", "double", "float", "char", "byte", "void", "String"],
    "//",
    C_COMMENT,
    b"\"'",
);
static KOTLIN: GenericTokenizerConfig = family(
    "kotlin",
    &[
        "fun", "val", "var", "class", "object", "interface", "when", "if", "else", "for",
        "while", "return", "import", "package", "null", "data", "sealed",
    ],
    &["Int", "String", "Boolean", "Double", "Unit", "Any"],
    "//",
    C_COMMENT,
    b"\"'",
);
static HASKELL: GenericTokenizerConfig = family(
    "haskell",
    &[
        "module", "import", "where", "let", "in", "case", "of", "if", "then", "else", "data",
        "type", "newtype", "class", "instance", "do", "deriving",
    ],
    &["Int", "Integer", "String", "Bool", "Maybe", "IO"],
    "--",
    ("{-", "-}"),
    b"\"",
);
static OBJECTIVE_C: GenericTokenizerConfig = family(
    "objective-c",
    &[
        "if", "else", "for", "while", "return", "self", "super", "nil", "YES", "NO",
        "interface", "implementation", "end", "property", "import",
    ],
    &["id", "int", "void", "BOOL", "NSString", "NSInteger"],
    "//",
    C_COMMENT,
    b"\"'",
);
static SCALA: GenericTokenizerConfig = family(
    "scala",
    &[
        "def", "val", "var", "class", "object", "trait", "extends", "with", "match", "case",
        "if", "else", "for", "yield", "import", "package", "new", "null",
    ],
    &["Int", "String", "Boolean", "Unit", "Any", "Option"],
    "//",
    C_COMMENT,
    b"\"",
);
static CSS: GenericTokenizerConfig =
    family("css", &["important", "media", "import"], &[], "", C_COMMENT, b"\"'");
static SCSS: GenericTokenizerConfig = family(
    "scss",
    &["mixin", "include", "extend", "if", "else", "each", "import", "use"],
    &[],
    "//",
    C_COMMENT,
    b"\"'",
);
static LESS: GenericTokenizerConfig =
    family("less", &["import", "when", "important"], &[], "//", C_COMMENT, b"\"'");
static HTML: GenericTokenizerConfig = family("html", &[], &[], "", ("<!--", "-->"), b"\"'");
static MARKDOWN: GenericTokenizerConfig = family("markdown", &[], &[], "", ("<!--", "-->"), b"");
static XML: GenericTokenizerConfig = family("xml", &[], &[], "", ("<!--", "-->"), b"\"'");
static LATEX: GenericTokenizerConfig = family(
    "latex",
    &["begin", "end", "section", "subsection", "usepackage", "documentclass"],
    &[],
    "%",
    NO_BLOCK,
    b"",
);
static PHP: GenericTokenizerConfig = family(
    "php",
    &[
        "function", "echo", "return", "if", "else", "elseif", "foreach", "as", "while", "class",
        "public", "private", "protected", "static", "new", "namespace", "use", "null",
    ],
    &["int", "string", "bool", "array", "float"],
    "//",
    C_COMMENT,
    b"\"'",
);
static PYTHON: GenericTokenizerConfig = family(
    "python",
    &[
        "def", "class", "return", "if", "elif", "else", "for", "while", "in", "not", "and",
        "or", "import", "from", "as", "with", "try", "except", "finally", "raise", "lambda",
        "yield", "pass", "None", "True", "False", "async", "await",
    ],
    &["int", "str", "float", "bool", "list", "dict", "tuple", "set"],
    "#",
    NO_BLOCK,
    b"\"'",
);
static R: GenericTokenizerConfig = family(
    "r",
    &[
        "function", "if", "else", "for", "while", "repeat", "return", "library", "NULL", "TRUE",
        "FALSE", "NA",
    ],
    &[],
    "#",
    NO_BLOCK,
    b"\"'",
);
static RUBY: GenericTokenizerConfig = family(
    "ruby",
    &[
        "def", "end", "class", "module", "if", "elsif", "else", "unless", "while", "do", "yield",
        "return", "require", "nil", "self", "begin", "rescue",
    ],
    &[],
    "#",
    NO_BLOCK,
    b"\"'",
);
static SQL: GenericTokenizerConfig = GenericTokenizerConfig {
    name: "sql",
    keywords: &[
        "select", "from", "where", "insert", "into", "values", "update", "set", "delete",
        "create", "table", "drop", "alter", "join", "left", "right", "inner", "outer", "on",
        "group", "by", "order", "having", "limit", "and", "or", "not", "null", "as",
    ],
    types: &["integer", "int", "text", "varchar", "boolean", "date", "timestamp"],
    line_comment: "--",
    block_comment: C_COMMENT,
    quotes: b"'\"",
    case_insensitive: true,
};
static SWIFT: GenericTokenizerConfig = family(
    "swift",
    &[
        "func", "let", "var", "class", "struct", "enum", "protocol", "extension", "if", "else",
        "guard", "for", "while", "return", "import", "nil", "self",
    ],
    &["Int", "String", "Bool", "Double", "Array", "Dictionary"],
    "//",
    C_COMMENT,
    b"\"",
);
static SHELL: GenericTokenizerConfig = family(
    "shell",
    &[
        "if", "then", "else", "elif", "fi", "for", "in", "do", "done", "while", "case", "esac",
        "function", "return", "export", "local", "echo",
    ],
    &[],
    "#",
    NO_BLOCK,
    b"\"'",
);
static VB: GenericTokenizerConfig = GenericTokenizerConfig {
    name: "vb",
    keywords: &[
        "dim", "as", "if", "then", "else", "end", "sub", "function", "return", "for", "next",
        "while", "class", "module", "public", "private", "new", "nothing",
    ],
    types: &["integer", "string", "boolean", "double", "object"],
    line_comment: "'",
    block_comment: NO_BLOCK,
    quotes: b"\"",
    case_insensitive: true,
};
static YAML: GenericTokenizerConfig =
    family("yaml", &["null", "yes", "no"], &[], "#", NO_BLOCK, b"\"'");
static GO: GenericTokenizerConfig = family(
    "go",
    &[
        "func", "package", "import", "var", "const", "type", "struct", "interface", "map",
        "chan", "go", "defer", "return", "if", "else", "for", "range", "switch", "case", "nil",
    ],
    &["int", "string", "bool", "error", "byte", "rune", "float64"],
    "//",
    C_COMMENT,
    b"\"'`",
);
static RUST: GenericTokenizerConfig = family(
    "rust",
    &[
        "fn", "let", "mut", "const", "static", "struct", "enum", "trait", "impl", "pub", "use",
        "mod", "crate", "self", "Self", "match", "if", "else", "for", "while", "loop", "return",
        "where", "as", "ref", "move", "async", "await", "unsafe", "dyn", "type",
    ],
    &[
        "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize", "f32", "f64",
        "bool", "char", "str", "String", "Vec", "Option", "Result", "Box",
    ],
    "//",
    C_COMMENT,
    b"\"",
);
static JULIA: GenericTokenizerConfig = family(
    "julia",
    &[
        "function", "end", "if", "elseif", "else", "for", "while", "return", "module", "using",
        "import", "struct", "mutable", "nothing",
    ],
    &["Int", "Float64", "String", "Bool"],
    "#",
    ("#=", "=#"),
    b"\"",
);
static PERL: GenericTokenizerConfig = family(
    "perl",
    &["my", "our", "sub", "if", "elsif", "else", "unless", "foreach", "while", "return", "use"],
    &[],
    "#",
    NO_BLOCK,
    b"\"'",
);
static TURTLE: GenericTokenizerConfig = family("turtle", &["prefix", "base", "a"], &[], "#", NO_BLOCK, b"\"'");
static SPARQL: GenericTokenizerConfig = GenericTokenizerConfig {
    name: "sparql",
    keywords: &[
        "select", "where", "prefix", "filter", "optional", "union", "distinct", "construct",
        "ask", "describe", "limit", "order", "by",
    ],
    types: &[],
    line_comment: "#",
    block_comment: NO_BLOCK,
    quotes: b"\"'",
    case_insensitive: true,
};
static VERILOG: GenericTokenizerConfig = family(
    "verilog",
    &[
        "module", "endmodule", "input", "output", "inout", "always", "assign", "begin", "end",
        "if", "else", "case", "endcase", "posedge", "negedge",
    ],
    &["wire", "reg", "integer"],
    "//",
    C_COMMENT,
    b"\"",
);
static VHDL: GenericTokenizerConfig = GenericTokenizerConfig {
    name: "vhdl",
    keywords: &[
        "entity", "architecture", "is", "begin", "end", "port", "signal", "process", "if",
        "then", "else", "library", "use", "of",
    ],
    types: &["std_logic", "std_logic_vector", "integer", "bit"],
    line_comment: "--",
    block_comment: NO_BLOCK,
    quotes: b"\"",
    case_insensitive: true,
};
static TCL: GenericTokenizerConfig = family(
    "tcl",
    &["proc", "set", "if", "else", "elseif", "foreach", "while", "return", "puts", "expr"],
    &[],
    "#",
    NO_BLOCK,
    b"\"",
);
static SCHEME: GenericTokenizerConfig = family(
    "scheme",
    &["define", "lambda", "let", "if", "cond", "else", "begin", "quote", "set"],
    &[],
    ";",
    ("#|", "|#"),
    b"\"",
);
static COMMON_LISP: GenericTokenizerConfig = family(
    "commonlisp",
    &["defun", "defvar", "defparameter", "let", "lambda", "if", "cond", "loop", "nil"],
    &[],
    ";",
    ("#|", "|#"),
    b"\"",
);
static POWERSHELL: GenericTokenizerConfig = GenericTokenizerConfig {
    name: "powershell",
    keywords: &[
        "function", "param", "if", "else", "elseif", "foreach", "while", "return", "begin",
        "process", "end", "try", "catch",
    ],
    types: &[],
    line_comment: "#",
    block_comment: ("<#", "#>"),
    quotes: b"\"'",
    case_insensitive: true,
};
static SMALLTALK: GenericTokenizerConfig =
    family("smalltalk", &["self", "super", "nil", "thisContext"], &[], "", ("\"", "\""), b"'");
static DART: GenericTokenizerConfig = family(
    "dart",
    &[
        "class", "extends", "import", "final", "const", "var", "void", "return", "if", "else",
        "for", "while", "async", "await", "new", "null", "this",
    ],
    &["int", "double", "String", "bool", "List", "Map"],
    "//",
    C_COMMENT,
    b"\"'",
);
static TOML: GenericTokenizerConfig = family("toml", &[], &[], "#", NO_BLOCK, b"\"'");
static DOCKERFILE: GenericTokenizerConfig = GenericTokenizerConfig {
    name: "dockerfile",
    keywords: &[
        "from", "run", "cmd", "label", "expose", "env", "add", "copy", "entrypoint", "volume",
        "user", "workdir", "arg", "as",
    ],
    types: &[],
    line_comment: "#",
    block_comment: NO_BLOCK,
    quotes: b"\"'",
    case_insensitive: true,
};
static DIFF: GenericTokenizerConfig = family("diff", &[], &[], "", NO_BLOCK, b"");
static OCTAVE: GenericTokenizerConfig = family(
    "octave",
    &[
        "function", "end", "endfunction", "if", "elseif", "else", "for", "while", "return",
        "endif", "endfor",
    ],
    &[],
    "%",
    ("%{", "%}"),
    b"\"'",
);

/// The default table in resolution order.
static TABLE: &[(Builtin, &[&str])] = &[
    (Builtin::Plain, &["mermaid"]),
    (Builtin::Generic(&JAVASCRIPT), &["javascript", "js", "node"]),
    (Builtin::Generic(&JSON), &["json"]),
    (Builtin::Generic(&TYPESCRIPT), &["typescript", "ts"]),
    (Builtin::Generic(&C), &["c"]),
    (Builtin::Generic(&CPP), &["c++", "cpp"]),
    (Builtin::Generic(&CSHARP), &["c#", "csharp", "cs"]),
    (Builtin::Generic(&CLOJURE), &["clojure"]),
    (Builtin::Generic(&ELM), &["elm"]),
    (Builtin::Generic(&FSHARP), &["f#", "fsharp"]),
    (Builtin::Generic(&FORTRAN), &["fortran"]),
    (Builtin::Generic(&JAVA), &["java"]),
    (Builtin::Generic(&KOTLIN), &["kotlin", "kt"]),
    (Builtin::Generic(&HASKELL), &["haskell", "hs"]),
    (Builtin::Generic(&OBJECTIVE_C), &["objective-c", "objectivec", "objc"]),
    (Builtin::Generic(&SCALA), &["scala"]),
    (Builtin::Generic(&CSS), &["css"]),
    (Builtin::Generic(&SCSS), &["scss"]),
    (Builtin::Generic(&LESS), &["less"]),
    (Builtin::Generic(&HTML), &["html"]),
    (Builtin::Generic(&MARKDOWN), &["markdown", "md"]),
    (Builtin::Generic(&XML), &["xml"]),
    (Builtin::Generic(&LATEX), &["latex", "tex"]),
    (Builtin::Generic(&PHP), &["php"]),
    (Builtin::Generic(&PYTHON), &["python", "py"]),
    (Builtin::Generic(&R), &["r"]),
    (Builtin::Generic(&RUBY), &["ruby", "rb"]),
    (Builtin::Generic(&SQL), &["sql"]),
    (Builtin::Generic(&SWIFT), &["swift"]),
    (Builtin::Generic(&SHELL), &["shell", "sh", "bash"]),
    (Builtin::Generic(&VB), &["vb.net", "vb", "visualbasic"]),
    (Builtin::Generic(&YAML), &["yaml", "yml"]),
    (Builtin::Generic(&GO), &["go"]),
    (Builtin::Generic(&RUST), &["rust", "rs"]),
    (Builtin::Generic(&JULIA), &["julia", "jl"]),
    (Builtin::Generic(&PERL), &["perl", "pl"]),
    (Builtin::Generic(&TURTLE), &["turtle", "ttl"]),
    (Builtin::Generic(&SPARQL), &["sparql"]),
    (Builtin::Generic(&VERILOG), &["verilog", "v"]),
    (Builtin::Generic(&VHDL), &["vhdl", "vhd"]),
    (Builtin::Generic(&TCL), &["tcl"]),
    (Builtin::Generic(&SCHEME), &["scheme"]),
    (Builtin::Generic(&COMMON_LISP), &["clisp", "commonlisp"]),
    (Builtin::Generic(&POWERSHELL), &["powershell"]),
    (Builtin::Generic(&SMALLTALK), &["smalltalk", "st"]),
    (Builtin::Generic(&DART), &["dart", "dt"]),
    (Builtin::Generic(&TOML), &["toml", "ini"]),
    (Builtin::Generic(&DOCKERFILE), &["docker", "dockerfile"]),
    (Builtin::Generic(&DIFF), &["diff"]),
    (Builtin::Generic(&OCTAVE), &["octave"]),
];

/// Populate a registry with the default table.
pub(super) fn populate(registry: &mut LanguageRegistry) {
    for (builtin, selectors) in TABLE {
        registry.push_entry(
            Some(builtin.handle()),
            selectors.iter().map(|s| (*s).to_owned()).collect(),
        );
    }
}
