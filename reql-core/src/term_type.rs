use std::fmt::{self, Display};

/// Integer code identifying the operation of a [`Term`](crate::Term) node.
///
/// The code is opaque to the wire layer, this type only knows how each code is
/// spelled when a query is printed back and which printing category it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermType(pub u32);

macro_rules! term_types {
    ($($name:ident = $code:literal => $method:literal),+ $(,)?) => {
        impl TermType {
            $(pub const $name: TermType = TermType($code);)+

            /// Name of the query builder method producing this term.
            pub fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($code => Some($method),)+
                    _ => None,
                }
            }
        }
    };
}

term_types! {
    DATUM = 1 => "expr",
    MAKE_ARRAY = 2 => "expr",
    MAKE_OBJ = 3 => "expr",
    VAR = 10 => "var",
    JAVASCRIPT = 11 => "js",
    ERROR = 12 => "error",
    IMPLICIT_VAR = 13 => "row",
    DB = 14 => "db",
    TABLE = 15 => "table",
    GET = 16 => "get",
    EQ = 17 => "eq",
    NE = 18 => "ne",
    LT = 19 => "lt",
    LE = 20 => "le",
    GT = 21 => "gt",
    GE = 22 => "ge",
    NOT = 23 => "not",
    ADD = 24 => "add",
    SUB = 25 => "sub",
    MUL = 26 => "mul",
    DIV = 27 => "div",
    MOD = 28 => "mod",
    APPEND = 29 => "append",
    SLICE = 30 => "slice",
    GET_FIELD = 31 => "getField",
    HAS_FIELDS = 32 => "hasFields",
    PLUCK = 33 => "pluck",
    WITHOUT = 34 => "without",
    MERGE = 35 => "merge",
    REDUCE = 37 => "reduce",
    MAP = 38 => "map",
    FILTER = 39 => "filter",
    CONCAT_MAP = 40 => "concatMap",
    ORDER_BY = 41 => "orderBy",
    DISTINCT = 42 => "distinct",
    COUNT = 43 => "count",
    UNION = 44 => "union",
    NTH = 45 => "nth",
    INNER_JOIN = 48 => "innerJoin",
    OUTER_JOIN = 49 => "outerJoin",
    EQ_JOIN = 50 => "eqJoin",
    COERCE_TO = 51 => "coerceTo",
    TYPE_OF = 52 => "typeOf",
    UPDATE = 53 => "update",
    DELETE = 54 => "delete",
    REPLACE = 55 => "replace",
    INSERT = 56 => "insert",
    DB_CREATE = 57 => "dbCreate",
    DB_DROP = 58 => "dbDrop",
    DB_LIST = 59 => "dbList",
    TABLE_CREATE = 60 => "tableCreate",
    TABLE_DROP = 61 => "tableDrop",
    TABLE_LIST = 62 => "tableList",
    FUNCALL = 64 => "do",
    BRANCH = 65 => "branch",
    OR = 66 => "or",
    AND = 67 => "and",
    FOR_EACH = 68 => "forEach",
    FUNC = 69 => "func",
    SKIP = 70 => "skip",
    LIMIT = 71 => "limit",
    ZIP = 72 => "zip",
    ASC = 73 => "asc",
    DESC = 74 => "desc",
    INDEX_CREATE = 75 => "indexCreate",
    INDEX_DROP = 76 => "indexDrop",
    INDEX_LIST = 77 => "indexList",
    GET_ALL = 78 => "getAll",
    INFO = 79 => "info",
    PREPEND = 80 => "prepend",
    SAMPLE = 81 => "sample",
    INSERT_AT = 82 => "insertAt",
    DELETE_AT = 83 => "deleteAt",
    CHANGE_AT = 84 => "changeAt",
    SPLICE_AT = 85 => "spliceAt",
    IS_EMPTY = 86 => "isEmpty",
    OFFSETS_OF = 87 => "offsetsOf",
    SET_INSERT = 88 => "setInsert",
    SET_INTERSECTION = 89 => "setIntersection",
    SET_UNION = 90 => "setUnion",
    SET_DIFFERENCE = 91 => "setDifference",
    DEFAULT = 92 => "default",
    CONTAINS = 93 => "contains",
    KEYS = 94 => "keys",
    DIFFERENCE = 95 => "difference",
    WITH_FIELDS = 96 => "withFields",
    MATCH = 97 => "match",
    JSON = 98 => "json",
    ISO8601 = 99 => "ISO8601",
    TO_ISO8601 = 100 => "toISO8601",
    EPOCH_TIME = 101 => "epochTime",
    TO_EPOCH_TIME = 102 => "toEpochTime",
    NOW = 103 => "now",
    IN_TIMEZONE = 104 => "inTimezone",
    DURING = 105 => "during",
    DATE = 106 => "date",
    MONDAY = 107 => "monday",
    TUESDAY = 108 => "tuesday",
    WEDNESDAY = 109 => "wednesday",
    THURSDAY = 110 => "thursday",
    FRIDAY = 111 => "friday",
    SATURDAY = 112 => "saturday",
    SUNDAY = 113 => "sunday",
    JANUARY = 114 => "january",
    FEBRUARY = 115 => "february",
    MARCH = 116 => "march",
    APRIL = 117 => "april",
    MAY = 118 => "may",
    JUNE = 119 => "june",
    JULY = 120 => "july",
    AUGUST = 121 => "august",
    SEPTEMBER = 122 => "september",
    OCTOBER = 123 => "october",
    NOVEMBER = 124 => "november",
    DECEMBER = 125 => "december",
    TIME_OF_DAY = 126 => "timeOfDay",
    TIMEZONE = 127 => "timezone",
    YEAR = 128 => "year",
    MONTH = 129 => "month",
    DAY = 130 => "day",
    DAY_OF_WEEK = 131 => "dayOfWeek",
    DAY_OF_YEAR = 132 => "dayOfYear",
    HOURS = 133 => "hours",
    MINUTES = 134 => "minutes",
    SECONDS = 135 => "seconds",
    TIME = 136 => "time",
    LITERAL = 137 => "literal",
    SYNC = 138 => "sync",
    INDEX_STATUS = 139 => "indexStatus",
    INDEX_WAIT = 140 => "indexWait",
    UPCASE = 141 => "upcase",
    DOWNCASE = 142 => "downcase",
    OBJECT = 143 => "object",
    GROUP = 144 => "group",
    SUM = 145 => "sum",
    AVG = 146 => "avg",
    MIN = 147 => "min",
    MAX = 148 => "max",
    SPLIT = 149 => "split",
    UNGROUP = 150 => "ungroup",
    RANDOM = 151 => "random",
    CHANGES = 152 => "changes",
    HTTP = 153 => "http",
    ARGS = 154 => "args",
    BINARY = 155 => "binary",
    INDEX_RENAME = 156 => "indexRename",
    GEOJSON = 157 => "geojson",
    TO_GEOJSON = 158 => "toGeojson",
    POINT = 159 => "point",
    LINE = 160 => "line",
    POLYGON = 161 => "polygon",
    DISTANCE = 162 => "distance",
    INTERSECTS = 163 => "intersects",
    INCLUDES = 164 => "includes",
    CIRCLE = 165 => "circle",
    GET_INTERSECTING = 166 => "getIntersecting",
    FILL = 167 => "fill",
    GET_NEAREST = 168 => "getNearest",
    UUID = 169 => "uuid",
    BRACKET = 170 => "bracket",
    POLYGON_SUB = 171 => "polygonSub",
    TO_JSON_STRING = 172 => "toJSON",
    RANGE = 173 => "range",
    CONFIG = 174 => "config",
    STATUS = 175 => "status",
    RECONFIGURE = 176 => "reconfigure",
    WAIT = 177 => "wait",
    REBALANCE = 179 => "rebalance",
    MINVAL = 180 => "minval",
    MAXVAL = 181 => "maxval",
    BETWEEN = 182 => "between",
    FLOOR = 183 => "floor",
    CEIL = 184 => "ceil",
    ROUND = 185 => "round",
    VALUES = 186 => "values",
    FOLD = 187 => "fold",
    GRANT = 188 => "grant",
}

impl TermType {
    /// Named constants, printed as `r.name` with no argument list.
    pub fn is_constant(self) -> bool {
        matches!(self.0, 107..=125 | 180 | 181)
    }

    /// Terms called on the top level namespace (`r.name(...)`) rather than on a receiver.
    pub fn is_prefix(self) -> bool {
        self.is_constant()
            || matches!(
                self,
                TermType::DB
                    | TermType::DB_CREATE
                    | TermType::DB_LIST
                    | TermType::DB_DROP
                    | TermType::NOW
                    | TermType::TIME
                    | TermType::EPOCH_TIME
                    | TermType::ISO8601
                    | TermType::BRANCH
                    | TermType::JAVASCRIPT
                    | TermType::ERROR
                    | TermType::MAKE_ARRAY
                    | TermType::JSON
                    | TermType::ARGS
                    | TermType::HTTP
                    | TermType::RANDOM
                    | TermType::BINARY
                    | TermType::OBJECT
                    | TermType::CIRCLE
                    | TermType::GEOJSON
                    | TermType::POINT
                    | TermType::LINE
                    | TermType::POLYGON
                    | TermType::UUID
                    | TermType::DESC
                    | TermType::ASC
                    | TermType::RANGE
                    | TermType::LITERAL
            )
    }
}

impl From<u32> for TermType {
    fn from(value: u32) -> Self {
        TermType(value)
    }
}

impl Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "<term {}>", self.0),
        }
    }
}
