//! PostgreSQL SQLSTATE taxonomy.
//!
//! Codes follow Appendix A of the PostgreSQL manual. A few codes share one
//! condition name (`2F002` and `38002` are both `modifying_sql_data_not_permitted`),
//! so the mapping from code to [`PgErrorKind`] is many-to-one.

use std::fmt;

/// Error condition reported by a PostgreSQL server, keyed by condition name.
///
/// `Unknown` covers every SQLSTATE missing from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgErrorKind {
    SuccessfulCompletion,
    Warning,
    DynamicResultSetsReturned,
    ImplicitZeroBitPadding,
    NullValueEliminatedInSetFunction,
    PrivilegeNotGranted,
    PrivilegeNotRevoked,
    StringDataRightTruncation,
    DeprecatedFeature,
    NoData,
    NoAdditionalDynamicResultSetsReturned,
    SqlStatementNotYetComplete,
    ConnectionException,
    ConnectionDoesNotExist,
    ConnectionFailure,
    SqlclientUnableToEstablishSqlconnection,
    SqlserverRejectedEstablishmentOfSqlconnection,
    TransactionResolutionUnknown,
    ProtocolViolation,
    TriggeredActionException,
    FeatureNotSupported,
    InvalidTransactionInitiation,
    LocatorException,
    InvalidLocatorSpecification,
    InvalidGrantor,
    InvalidGrantOperation,
    InvalidRoleSpecification,
    DiagnosticsException,
    StackedDiagnosticsAccessedWithoutActiveHandler,
    CaseNotFound,
    CardinalityViolation,
    DataException,
    ArraySubscriptError,
    CharacterNotInRepertoire,
    DatetimeFieldOverflow,
    DivisionByZero,
    ErrorInAssignment,
    EscapeCharacterConflict,
    IndicatorOverflow,
    IntervalFieldOverflow,
    InvalidArgumentForLogarithm,
    InvalidArgumentForNtileFunction,
    InvalidArgumentForNthValueFunction,
    InvalidArgumentForPowerFunction,
    InvalidArgumentForWidthBucketFunction,
    InvalidCharacterValueForCast,
    InvalidDatetimeFormat,
    InvalidEscapeCharacter,
    InvalidEscapeOctet,
    InvalidEscapeSequence,
    NonstandardUseOfEscapeCharacter,
    InvalidIndicatorParameterValue,
    InvalidParameterValue,
    InvalidRegularExpression,
    InvalidRowCountInLimitClause,
    InvalidRowCountInResultOffsetClause,
    InvalidTimeZoneDisplacementValue,
    InvalidUseOfEscapeCharacter,
    MostSpecificTypeMismatch,
    NullValueNotAllowed,
    NullValueNoIndicatorParameter,
    NumericValueOutOfRange,
    SequenceGeneratorLimitExceeded,
    StringDataLengthMismatch,
    SubstringError,
    TrimError,
    UnterminatedCString,
    ZeroLengthCharacterString,
    FloatingPointException,
    InvalidTextRepresentation,
    InvalidBinaryRepresentation,
    BadCopyFileFormat,
    UntranslatableCharacter,
    NotAnXmlDocument,
    InvalidXmlDocument,
    InvalidXmlContent,
    InvalidXmlComment,
    InvalidXmlProcessingInstruction,
    IntegrityConstraintViolation,
    RestrictViolation,
    NotNullViolation,
    ForeignKeyViolation,
    UniqueViolation,
    CheckViolation,
    ExclusionViolation,
    InvalidCursorState,
    InvalidTransactionState,
    ActiveSqlTransaction,
    BranchTransactionAlreadyActive,
    HeldCursorRequiresSameIsolationLevel,
    InappropriateAccessModeForBranchTransaction,
    InappropriateIsolationLevelForBranchTransaction,
    NoActiveSqlTransactionForBranchTransaction,
    ReadOnlySqlTransaction,
    SchemaAndDataStatementMixingNotSupported,
    NoActiveSqlTransaction,
    InFailedSqlTransaction,
    InvalidSqlStatementName,
    TriggeredDataChangeViolation,
    InvalidAuthorizationSpecification,
    InvalidPassword,
    DependentPrivilegeDescriptorsStillExist,
    DependentObjectsStillExist,
    InvalidTransactionTermination,
    SqlRoutineException,
    FunctionExecutedNoReturnStatement,
    ModifyingSqlDataNotPermitted,
    ProhibitedSqlStatementAttempted,
    ReadingSqlDataNotPermitted,
    InvalidCursorName,
    ExternalRoutineException,
    ContainingSqlNotPermitted,
    ExternalRoutineInvocationException,
    InvalidSqlstateReturned,
    TriggerProtocolViolated,
    SrfProtocolViolated,
    SavepointException,
    InvalidSavepointSpecification,
    InvalidCatalogName,
    InvalidSchemaName,
    TransactionRollback,
    TransactionIntegrityConstraintViolation,
    SerializationFailure,
    StatementCompletionUnknown,
    DeadlockDetected,
    SyntaxErrorOrAccessRuleViolation,
    SyntaxError,
    InsufficientPrivilege,
    CannotCoerce,
    GroupingError,
    WindowingError,
    InvalidRecursion,
    InvalidForeignKey,
    InvalidName,
    NameTooLong,
    ReservedName,
    DatatypeMismatch,
    IndeterminateDatatype,
    CollationMismatch,
    IndeterminateCollation,
    WrongObjectType,
    UndefinedColumn,
    UndefinedFunction,
    UndefinedTable,
    UndefinedParameter,
    UndefinedObject,
    DuplicateColumn,
    DuplicateCursor,
    DuplicateDatabase,
    DuplicateFunction,
    DuplicatePreparedStatement,
    DuplicateSchema,
    DuplicateTable,
    DuplicateAlias,
    DuplicateObject,
    AmbiguousColumn,
    AmbiguousFunction,
    AmbiguousParameter,
    AmbiguousAlias,
    InvalidColumnReference,
    InvalidColumnDefinition,
    InvalidCursorDefinition,
    InvalidDatabaseDefinition,
    InvalidFunctionDefinition,
    InvalidPreparedStatementDefinition,
    InvalidSchemaDefinition,
    InvalidTableDefinition,
    InvalidObjectDefinition,
    WithCheckOptionViolation,
    InsufficientResources,
    DiskFull,
    OutOfMemory,
    TooManyConnections,
    ConfigurationLimitExceeded,
    ProgramLimitExceeded,
    StatementTooComplex,
    TooManyColumns,
    TooManyArguments,
    ObjectNotInPrerequisiteState,
    ObjectInUse,
    CantChangeRuntimeParam,
    LockNotAvailable,
    OperatorIntervention,
    QueryCanceled,
    AdminShutdown,
    CrashShutdown,
    CannotConnectNow,
    DatabaseDropped,
    SystemError,
    IoError,
    UndefinedFile,
    DuplicateFile,
    ConfigFileError,
    LockFileExists,
    FdwError,
    FdwColumnNameNotFound,
    FdwDynamicParameterValueNeeded,
    FdwFunctionSequenceError,
    FdwInconsistentDescriptorInformation,
    FdwInvalidAttributeValue,
    FdwInvalidColumnName,
    FdwInvalidColumnNumber,
    FdwInvalidDataType,
    FdwInvalidDataTypeDescriptors,
    FdwInvalidDescriptorFieldIdentifier,
    FdwInvalidHandle,
    FdwInvalidOptionIndex,
    FdwInvalidOptionName,
    FdwInvalidStringLengthOrBufferLength,
    FdwInvalidStringFormat,
    FdwInvalidUseOfNullPointer,
    FdwTooManyHandles,
    FdwOutOfMemory,
    FdwNoSchemas,
    FdwOptionNameNotFound,
    FdwReplyHandle,
    FdwSchemaNotFound,
    FdwTableNotFound,
    FdwUnableToCreateExecution,
    FdwUnableToCreateReply,
    FdwUnableToEstablishConnection,
    PlpgsqlError,
    RaiseException,
    NoDataFound,
    TooManyRows,
    InternalError,
    DataCorrupted,
    IndexCorrupted,
    Unknown,
}

impl PgErrorKind {
    /// Every condition in the table, in SQLSTATE order of first appearance.
    pub const ALL: &'static [PgErrorKind] = &[
        Self::SuccessfulCompletion,
        Self::Warning,
        Self::DynamicResultSetsReturned,
        Self::ImplicitZeroBitPadding,
        Self::NullValueEliminatedInSetFunction,
        Self::PrivilegeNotGranted,
        Self::PrivilegeNotRevoked,
        Self::StringDataRightTruncation,
        Self::DeprecatedFeature,
        Self::NoData,
        Self::NoAdditionalDynamicResultSetsReturned,
        Self::SqlStatementNotYetComplete,
        Self::ConnectionException,
        Self::ConnectionDoesNotExist,
        Self::ConnectionFailure,
        Self::SqlclientUnableToEstablishSqlconnection,
        Self::SqlserverRejectedEstablishmentOfSqlconnection,
        Self::TransactionResolutionUnknown,
        Self::ProtocolViolation,
        Self::TriggeredActionException,
        Self::FeatureNotSupported,
        Self::InvalidTransactionInitiation,
        Self::LocatorException,
        Self::InvalidLocatorSpecification,
        Self::InvalidGrantor,
        Self::InvalidGrantOperation,
        Self::InvalidRoleSpecification,
        Self::DiagnosticsException,
        Self::StackedDiagnosticsAccessedWithoutActiveHandler,
        Self::CaseNotFound,
        Self::CardinalityViolation,
        Self::DataException,
        Self::ArraySubscriptError,
        Self::CharacterNotInRepertoire,
        Self::DatetimeFieldOverflow,
        Self::DivisionByZero,
        Self::ErrorInAssignment,
        Self::EscapeCharacterConflict,
        Self::IndicatorOverflow,
        Self::IntervalFieldOverflow,
        Self::InvalidArgumentForLogarithm,
        Self::InvalidArgumentForNtileFunction,
        Self::InvalidArgumentForNthValueFunction,
        Self::InvalidArgumentForPowerFunction,
        Self::InvalidArgumentForWidthBucketFunction,
        Self::InvalidCharacterValueForCast,
        Self::InvalidDatetimeFormat,
        Self::InvalidEscapeCharacter,
        Self::InvalidEscapeOctet,
        Self::InvalidEscapeSequence,
        Self::NonstandardUseOfEscapeCharacter,
        Self::InvalidIndicatorParameterValue,
        Self::InvalidParameterValue,
        Self::InvalidRegularExpression,
        Self::InvalidRowCountInLimitClause,
        Self::InvalidRowCountInResultOffsetClause,
        Self::InvalidTimeZoneDisplacementValue,
        Self::InvalidUseOfEscapeCharacter,
        Self::MostSpecificTypeMismatch,
        Self::NullValueNotAllowed,
        Self::NullValueNoIndicatorParameter,
        Self::NumericValueOutOfRange,
        Self::SequenceGeneratorLimitExceeded,
        Self::StringDataLengthMismatch,
        Self::SubstringError,
        Self::TrimError,
        Self::UnterminatedCString,
        Self::ZeroLengthCharacterString,
        Self::FloatingPointException,
        Self::InvalidTextRepresentation,
        Self::InvalidBinaryRepresentation,
        Self::BadCopyFileFormat,
        Self::UntranslatableCharacter,
        Self::NotAnXmlDocument,
        Self::InvalidXmlDocument,
        Self::InvalidXmlContent,
        Self::InvalidXmlComment,
        Self::InvalidXmlProcessingInstruction,
        Self::IntegrityConstraintViolation,
        Self::RestrictViolation,
        Self::NotNullViolation,
        Self::ForeignKeyViolation,
        Self::UniqueViolation,
        Self::CheckViolation,
        Self::ExclusionViolation,
        Self::InvalidCursorState,
        Self::InvalidTransactionState,
        Self::ActiveSqlTransaction,
        Self::BranchTransactionAlreadyActive,
        Self::HeldCursorRequiresSameIsolationLevel,
        Self::InappropriateAccessModeForBranchTransaction,
        Self::InappropriateIsolationLevelForBranchTransaction,
        Self::NoActiveSqlTransactionForBranchTransaction,
        Self::ReadOnlySqlTransaction,
        Self::SchemaAndDataStatementMixingNotSupported,
        Self::NoActiveSqlTransaction,
        Self::InFailedSqlTransaction,
        Self::InvalidSqlStatementName,
        Self::TriggeredDataChangeViolation,
        Self::InvalidAuthorizationSpecification,
        Self::InvalidPassword,
        Self::DependentPrivilegeDescriptorsStillExist,
        Self::DependentObjectsStillExist,
        Self::InvalidTransactionTermination,
        Self::SqlRoutineException,
        Self::FunctionExecutedNoReturnStatement,
        Self::ModifyingSqlDataNotPermitted,
        Self::ProhibitedSqlStatementAttempted,
        Self::ReadingSqlDataNotPermitted,
        Self::InvalidCursorName,
        Self::ExternalRoutineException,
        Self::ContainingSqlNotPermitted,
        Self::ExternalRoutineInvocationException,
        Self::InvalidSqlstateReturned,
        Self::TriggerProtocolViolated,
        Self::SrfProtocolViolated,
        Self::SavepointException,
        Self::InvalidSavepointSpecification,
        Self::InvalidCatalogName,
        Self::InvalidSchemaName,
        Self::TransactionRollback,
        Self::TransactionIntegrityConstraintViolation,
        Self::SerializationFailure,
        Self::StatementCompletionUnknown,
        Self::DeadlockDetected,
        Self::SyntaxErrorOrAccessRuleViolation,
        Self::SyntaxError,
        Self::InsufficientPrivilege,
        Self::CannotCoerce,
        Self::GroupingError,
        Self::WindowingError,
        Self::InvalidRecursion,
        Self::InvalidForeignKey,
        Self::InvalidName,
        Self::NameTooLong,
        Self::ReservedName,
        Self::DatatypeMismatch,
        Self::IndeterminateDatatype,
        Self::CollationMismatch,
        Self::IndeterminateCollation,
        Self::WrongObjectType,
        Self::UndefinedColumn,
        Self::UndefinedFunction,
        Self::UndefinedTable,
        Self::UndefinedParameter,
        Self::UndefinedObject,
        Self::DuplicateColumn,
        Self::DuplicateCursor,
        Self::DuplicateDatabase,
        Self::DuplicateFunction,
        Self::DuplicatePreparedStatement,
        Self::DuplicateSchema,
        Self::DuplicateTable,
        Self::DuplicateAlias,
        Self::DuplicateObject,
        Self::AmbiguousColumn,
        Self::AmbiguousFunction,
        Self::AmbiguousParameter,
        Self::AmbiguousAlias,
        Self::InvalidColumnReference,
        Self::InvalidColumnDefinition,
        Self::InvalidCursorDefinition,
        Self::InvalidDatabaseDefinition,
        Self::InvalidFunctionDefinition,
        Self::InvalidPreparedStatementDefinition,
        Self::InvalidSchemaDefinition,
        Self::InvalidTableDefinition,
        Self::InvalidObjectDefinition,
        Self::WithCheckOptionViolation,
        Self::InsufficientResources,
        Self::DiskFull,
        Self::OutOfMemory,
        Self::TooManyConnections,
        Self::ConfigurationLimitExceeded,
        Self::ProgramLimitExceeded,
        Self::StatementTooComplex,
        Self::TooManyColumns,
        Self::TooManyArguments,
        Self::ObjectNotInPrerequisiteState,
        Self::ObjectInUse,
        Self::CantChangeRuntimeParam,
        Self::LockNotAvailable,
        Self::OperatorIntervention,
        Self::QueryCanceled,
        Self::AdminShutdown,
        Self::CrashShutdown,
        Self::CannotConnectNow,
        Self::DatabaseDropped,
        Self::SystemError,
        Self::IoError,
        Self::UndefinedFile,
        Self::DuplicateFile,
        Self::ConfigFileError,
        Self::LockFileExists,
        Self::FdwError,
        Self::FdwColumnNameNotFound,
        Self::FdwDynamicParameterValueNeeded,
        Self::FdwFunctionSequenceError,
        Self::FdwInconsistentDescriptorInformation,
        Self::FdwInvalidAttributeValue,
        Self::FdwInvalidColumnName,
        Self::FdwInvalidColumnNumber,
        Self::FdwInvalidDataType,
        Self::FdwInvalidDataTypeDescriptors,
        Self::FdwInvalidDescriptorFieldIdentifier,
        Self::FdwInvalidHandle,
        Self::FdwInvalidOptionIndex,
        Self::FdwInvalidOptionName,
        Self::FdwInvalidStringLengthOrBufferLength,
        Self::FdwInvalidStringFormat,
        Self::FdwInvalidUseOfNullPointer,
        Self::FdwTooManyHandles,
        Self::FdwOutOfMemory,
        Self::FdwNoSchemas,
        Self::FdwOptionNameNotFound,
        Self::FdwReplyHandle,
        Self::FdwSchemaNotFound,
        Self::FdwTableNotFound,
        Self::FdwUnableToCreateExecution,
        Self::FdwUnableToCreateReply,
        Self::FdwUnableToEstablishConnection,
        Self::PlpgsqlError,
        Self::RaiseException,
        Self::NoDataFound,
        Self::TooManyRows,
        Self::InternalError,
        Self::DataCorrupted,
        Self::IndexCorrupted,
    ];

    /// Map a five-character SQLSTATE to its condition.
    pub fn from_code(code: &str) -> Self {
        match code {
            "00000" => Self::SuccessfulCompletion,
            "01000" => Self::Warning,
            "0100C" => Self::DynamicResultSetsReturned,
            "01008" => Self::ImplicitZeroBitPadding,
            "01003" => Self::NullValueEliminatedInSetFunction,
            "01007" => Self::PrivilegeNotGranted,
            "01006" => Self::PrivilegeNotRevoked,
            "01004" => Self::StringDataRightTruncation,
            "01P01" => Self::DeprecatedFeature,
            "02000" => Self::NoData,
            "02001" => Self::NoAdditionalDynamicResultSetsReturned,
            "03000" => Self::SqlStatementNotYetComplete,
            "08000" => Self::ConnectionException,
            "08003" => Self::ConnectionDoesNotExist,
            "08006" => Self::ConnectionFailure,
            "08001" => Self::SqlclientUnableToEstablishSqlconnection,
            "08004" => Self::SqlserverRejectedEstablishmentOfSqlconnection,
            "08007" => Self::TransactionResolutionUnknown,
            "08P01" => Self::ProtocolViolation,
            "09000" => Self::TriggeredActionException,
            "0A000" => Self::FeatureNotSupported,
            "0B000" => Self::InvalidTransactionInitiation,
            "0F000" => Self::LocatorException,
            "0F001" => Self::InvalidLocatorSpecification,
            "0L000" => Self::InvalidGrantor,
            "0LP01" => Self::InvalidGrantOperation,
            "0P000" => Self::InvalidRoleSpecification,
            "0Z000" => Self::DiagnosticsException,
            "0Z002" => Self::StackedDiagnosticsAccessedWithoutActiveHandler,
            "20000" => Self::CaseNotFound,
            "21000" => Self::CardinalityViolation,
            "22000" => Self::DataException,
            "2202E" => Self::ArraySubscriptError,
            "22021" => Self::CharacterNotInRepertoire,
            "22008" => Self::DatetimeFieldOverflow,
            "22012" => Self::DivisionByZero,
            "22005" => Self::ErrorInAssignment,
            "2200B" => Self::EscapeCharacterConflict,
            "22022" => Self::IndicatorOverflow,
            "22015" => Self::IntervalFieldOverflow,
            "2201E" => Self::InvalidArgumentForLogarithm,
            "22014" => Self::InvalidArgumentForNtileFunction,
            "22016" => Self::InvalidArgumentForNthValueFunction,
            "2201F" => Self::InvalidArgumentForPowerFunction,
            "2201G" => Self::InvalidArgumentForWidthBucketFunction,
            "22018" => Self::InvalidCharacterValueForCast,
            "22007" => Self::InvalidDatetimeFormat,
            "22019" => Self::InvalidEscapeCharacter,
            "2200D" => Self::InvalidEscapeOctet,
            "22025" => Self::InvalidEscapeSequence,
            "22P06" => Self::NonstandardUseOfEscapeCharacter,
            "22010" => Self::InvalidIndicatorParameterValue,
            "22023" => Self::InvalidParameterValue,
            "2201B" => Self::InvalidRegularExpression,
            "2201W" => Self::InvalidRowCountInLimitClause,
            "2201X" => Self::InvalidRowCountInResultOffsetClause,
            "22009" => Self::InvalidTimeZoneDisplacementValue,
            "2200C" => Self::InvalidUseOfEscapeCharacter,
            "2200G" => Self::MostSpecificTypeMismatch,
            "22004" => Self::NullValueNotAllowed,
            "22002" => Self::NullValueNoIndicatorParameter,
            "22003" => Self::NumericValueOutOfRange,
            "2200H" => Self::SequenceGeneratorLimitExceeded,
            "22026" => Self::StringDataLengthMismatch,
            "22001" => Self::StringDataRightTruncation,
            "22011" => Self::SubstringError,
            "22027" => Self::TrimError,
            "22024" => Self::UnterminatedCString,
            "2200F" => Self::ZeroLengthCharacterString,
            "22P01" => Self::FloatingPointException,
            "22P02" => Self::InvalidTextRepresentation,
            "22P03" => Self::InvalidBinaryRepresentation,
            "22P04" => Self::BadCopyFileFormat,
            "22P05" => Self::UntranslatableCharacter,
            "2200L" => Self::NotAnXmlDocument,
            "2200M" => Self::InvalidXmlDocument,
            "2200N" => Self::InvalidXmlContent,
            "2200S" => Self::InvalidXmlComment,
            "2200T" => Self::InvalidXmlProcessingInstruction,
            "23000" => Self::IntegrityConstraintViolation,
            "23001" => Self::RestrictViolation,
            "23502" => Self::NotNullViolation,
            "23503" => Self::ForeignKeyViolation,
            "23505" => Self::UniqueViolation,
            "23514" => Self::CheckViolation,
            "23P01" => Self::ExclusionViolation,
            "24000" => Self::InvalidCursorState,
            "25000" => Self::InvalidTransactionState,
            "25001" => Self::ActiveSqlTransaction,
            "25002" => Self::BranchTransactionAlreadyActive,
            "25008" => Self::HeldCursorRequiresSameIsolationLevel,
            "25003" => Self::InappropriateAccessModeForBranchTransaction,
            "25004" => Self::InappropriateIsolationLevelForBranchTransaction,
            "25005" => Self::NoActiveSqlTransactionForBranchTransaction,
            "25006" => Self::ReadOnlySqlTransaction,
            "25007" => Self::SchemaAndDataStatementMixingNotSupported,
            "25P01" => Self::NoActiveSqlTransaction,
            "25P02" => Self::InFailedSqlTransaction,
            "26000" => Self::InvalidSqlStatementName,
            "27000" => Self::TriggeredDataChangeViolation,
            "28000" => Self::InvalidAuthorizationSpecification,
            "28P01" => Self::InvalidPassword,
            "2B000" => Self::DependentPrivilegeDescriptorsStillExist,
            "2BP01" => Self::DependentObjectsStillExist,
            "2D000" => Self::InvalidTransactionTermination,
            "2F000" => Self::SqlRoutineException,
            "2F005" => Self::FunctionExecutedNoReturnStatement,
            "2F002" => Self::ModifyingSqlDataNotPermitted,
            "2F003" => Self::ProhibitedSqlStatementAttempted,
            "2F004" => Self::ReadingSqlDataNotPermitted,
            "34000" => Self::InvalidCursorName,
            "38000" => Self::ExternalRoutineException,
            "38001" => Self::ContainingSqlNotPermitted,
            "38002" => Self::ModifyingSqlDataNotPermitted,
            "38003" => Self::ProhibitedSqlStatementAttempted,
            "38004" => Self::ReadingSqlDataNotPermitted,
            "39000" => Self::ExternalRoutineInvocationException,
            "39001" => Self::InvalidSqlstateReturned,
            "39004" => Self::NullValueNotAllowed,
            "39P01" => Self::TriggerProtocolViolated,
            "39P02" => Self::SrfProtocolViolated,
            "3B000" => Self::SavepointException,
            "3B001" => Self::InvalidSavepointSpecification,
            "3D000" => Self::InvalidCatalogName,
            "3F000" => Self::InvalidSchemaName,
            "40000" => Self::TransactionRollback,
            "40002" => Self::TransactionIntegrityConstraintViolation,
            "40001" => Self::SerializationFailure,
            "40003" => Self::StatementCompletionUnknown,
            "40P01" => Self::DeadlockDetected,
            "42000" => Self::SyntaxErrorOrAccessRuleViolation,
            "42601" => Self::SyntaxError,
            "42501" => Self::InsufficientPrivilege,
            "42846" => Self::CannotCoerce,
            "42803" => Self::GroupingError,
            "42P20" => Self::WindowingError,
            "42P19" => Self::InvalidRecursion,
            "42830" => Self::InvalidForeignKey,
            "42602" => Self::InvalidName,
            "42622" => Self::NameTooLong,
            "42939" => Self::ReservedName,
            "42804" => Self::DatatypeMismatch,
            "42P18" => Self::IndeterminateDatatype,
            "42P21" => Self::CollationMismatch,
            "42P22" => Self::IndeterminateCollation,
            "42809" => Self::WrongObjectType,
            "42703" => Self::UndefinedColumn,
            "42883" => Self::UndefinedFunction,
            "42P01" => Self::UndefinedTable,
            "42P02" => Self::UndefinedParameter,
            "42704" => Self::UndefinedObject,
            "42701" => Self::DuplicateColumn,
            "42P03" => Self::DuplicateCursor,
            "42P04" => Self::DuplicateDatabase,
            "42723" => Self::DuplicateFunction,
            "42P05" => Self::DuplicatePreparedStatement,
            "42P06" => Self::DuplicateSchema,
            "42P07" => Self::DuplicateTable,
            "42712" => Self::DuplicateAlias,
            "42710" => Self::DuplicateObject,
            "42702" => Self::AmbiguousColumn,
            "42725" => Self::AmbiguousFunction,
            "42P08" => Self::AmbiguousParameter,
            "42P09" => Self::AmbiguousAlias,
            "42P10" => Self::InvalidColumnReference,
            "42611" => Self::InvalidColumnDefinition,
            "42P11" => Self::InvalidCursorDefinition,
            "42P12" => Self::InvalidDatabaseDefinition,
            "42P13" => Self::InvalidFunctionDefinition,
            "42P14" => Self::InvalidPreparedStatementDefinition,
            "42P15" => Self::InvalidSchemaDefinition,
            "42P16" => Self::InvalidTableDefinition,
            "42P17" => Self::InvalidObjectDefinition,
            "44000" => Self::WithCheckOptionViolation,
            "53000" => Self::InsufficientResources,
            "53100" => Self::DiskFull,
            "53200" => Self::OutOfMemory,
            "53300" => Self::TooManyConnections,
            "53400" => Self::ConfigurationLimitExceeded,
            "54000" => Self::ProgramLimitExceeded,
            "54001" => Self::StatementTooComplex,
            "54011" => Self::TooManyColumns,
            "54023" => Self::TooManyArguments,
            "55000" => Self::ObjectNotInPrerequisiteState,
            "55006" => Self::ObjectInUse,
            "55P02" => Self::CantChangeRuntimeParam,
            "55P03" => Self::LockNotAvailable,
            "57000" => Self::OperatorIntervention,
            "57014" => Self::QueryCanceled,
            "57P01" => Self::AdminShutdown,
            "57P02" => Self::CrashShutdown,
            "57P03" => Self::CannotConnectNow,
            "57P04" => Self::DatabaseDropped,
            "58000" => Self::SystemError,
            "58030" => Self::IoError,
            "58P01" => Self::UndefinedFile,
            "58P02" => Self::DuplicateFile,
            "F0000" => Self::ConfigFileError,
            "F0001" => Self::LockFileExists,
            "HV000" => Self::FdwError,
            "HV005" => Self::FdwColumnNameNotFound,
            "HV002" => Self::FdwDynamicParameterValueNeeded,
            "HV010" => Self::FdwFunctionSequenceError,
            "HV021" => Self::FdwInconsistentDescriptorInformation,
            "HV024" => Self::FdwInvalidAttributeValue,
            "HV007" => Self::FdwInvalidColumnName,
            "HV008" => Self::FdwInvalidColumnNumber,
            "HV004" => Self::FdwInvalidDataType,
            "HV006" => Self::FdwInvalidDataTypeDescriptors,
            "HV091" => Self::FdwInvalidDescriptorFieldIdentifier,
            "HV00B" => Self::FdwInvalidHandle,
            "HV00C" => Self::FdwInvalidOptionIndex,
            "HV00D" => Self::FdwInvalidOptionName,
            "HV090" => Self::FdwInvalidStringLengthOrBufferLength,
            "HV00A" => Self::FdwInvalidStringFormat,
            "HV009" => Self::FdwInvalidUseOfNullPointer,
            "HV014" => Self::FdwTooManyHandles,
            "HV001" => Self::FdwOutOfMemory,
            "HV00P" => Self::FdwNoSchemas,
            "HV00J" => Self::FdwOptionNameNotFound,
            "HV00K" => Self::FdwReplyHandle,
            "HV00Q" => Self::FdwSchemaNotFound,
            "HV00R" => Self::FdwTableNotFound,
            "HV00L" => Self::FdwUnableToCreateExecution,
            "HV00M" => Self::FdwUnableToCreateReply,
            "HV00N" => Self::FdwUnableToEstablishConnection,
            "P0000" => Self::PlpgsqlError,
            "P0001" => Self::RaiseException,
            "P0002" => Self::NoDataFound,
            "P0003" => Self::TooManyRows,
            "XX000" => Self::InternalError,
            "XX001" => Self::DataCorrupted,
            "XX002" => Self::IndexCorrupted,
            _ => Self::Unknown,
        }
    }

    /// Condition name as spelled in the PostgreSQL manual.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuccessfulCompletion => "successful_completion",
            Self::Warning => "warning",
            Self::DynamicResultSetsReturned => "dynamic_result_sets_returned",
            Self::ImplicitZeroBitPadding => "implicit_zero_bit_padding",
            Self::NullValueEliminatedInSetFunction => "null_value_eliminated_in_set_function",
            Self::PrivilegeNotGranted => "privilege_not_granted",
            Self::PrivilegeNotRevoked => "privilege_not_revoked",
            Self::StringDataRightTruncation => "string_data_right_truncation",
            Self::DeprecatedFeature => "deprecated_feature",
            Self::NoData => "no_data",
            Self::NoAdditionalDynamicResultSetsReturned => "no_additional_dynamic_result_sets_returned",
            Self::SqlStatementNotYetComplete => "sql_statement_not_yet_complete",
            Self::ConnectionException => "connection_exception",
            Self::ConnectionDoesNotExist => "connection_does_not_exist",
            Self::ConnectionFailure => "connection_failure",
            Self::SqlclientUnableToEstablishSqlconnection => "sqlclient_unable_to_establish_sqlconnection",
            Self::SqlserverRejectedEstablishmentOfSqlconnection => "sqlserver_rejected_establishment_of_sqlconnection",
            Self::TransactionResolutionUnknown => "transaction_resolution_unknown",
            Self::ProtocolViolation => "protocol_violation",
            Self::TriggeredActionException => "triggered_action_exception",
            Self::FeatureNotSupported => "feature_not_supported",
            Self::InvalidTransactionInitiation => "invalid_transaction_initiation",
            Self::LocatorException => "locator_exception",
            Self::InvalidLocatorSpecification => "invalid_locator_specification",
            Self::InvalidGrantor => "invalid_grantor",
            Self::InvalidGrantOperation => "invalid_grant_operation",
            Self::InvalidRoleSpecification => "invalid_role_specification",
            Self::DiagnosticsException => "diagnostics_exception",
            Self::StackedDiagnosticsAccessedWithoutActiveHandler => "stacked_diagnostics_accessed_without_active_handler",
            Self::CaseNotFound => "case_not_found",
            Self::CardinalityViolation => "cardinality_violation",
            Self::DataException => "data_exception",
            Self::ArraySubscriptError => "array_subscript_error",
            Self::CharacterNotInRepertoire => "character_not_in_repertoire",
            Self::DatetimeFieldOverflow => "datetime_field_overflow",
            Self::DivisionByZero => "division_by_zero",
            Self::ErrorInAssignment => "error_in_assignment",
            Self::EscapeCharacterConflict => "escape_character_conflict",
            Self::IndicatorOverflow => "indicator_overflow",
            Self::IntervalFieldOverflow => "interval_field_overflow",
            Self::InvalidArgumentForLogarithm => "invalid_argument_for_logarithm",
            Self::InvalidArgumentForNtileFunction => "invalid_argument_for_ntile_function",
            Self::InvalidArgumentForNthValueFunction => "invalid_argument_for_nth_value_function",
            Self::InvalidArgumentForPowerFunction => "invalid_argument_for_power_function",
            Self::InvalidArgumentForWidthBucketFunction => "invalid_argument_for_width_bucket_function",
            Self::InvalidCharacterValueForCast => "invalid_character_value_for_cast",
            Self::InvalidDatetimeFormat => "invalid_datetime_format",
            Self::InvalidEscapeCharacter => "invalid_escape_character",
            Self::InvalidEscapeOctet => "invalid_escape_octet",
            Self::InvalidEscapeSequence => "invalid_escape_sequence",
            Self::NonstandardUseOfEscapeCharacter => "nonstandard_use_of_escape_character",
            Self::InvalidIndicatorParameterValue => "invalid_indicator_parameter_value",
            Self::InvalidParameterValue => "invalid_parameter_value",
            Self::InvalidRegularExpression => "invalid_regular_expression",
            Self::InvalidRowCountInLimitClause => "invalid_row_count_in_limit_clause",
            Self::InvalidRowCountInResultOffsetClause => "invalid_row_count_in_result_offset_clause",
            Self::InvalidTimeZoneDisplacementValue => "invalid_time_zone_displacement_value",
            Self::InvalidUseOfEscapeCharacter => "invalid_use_of_escape_character",
            Self::MostSpecificTypeMismatch => "most_specific_type_mismatch",
            Self::NullValueNotAllowed => "null_value_not_allowed",
            Self::NullValueNoIndicatorParameter => "null_value_no_indicator_parameter",
            Self::NumericValueOutOfRange => "numeric_value_out_of_range",
            Self::SequenceGeneratorLimitExceeded => "sequence_generator_limit_exceeded",
            Self::StringDataLengthMismatch => "string_data_length_mismatch",
            Self::SubstringError => "substring_error",
            Self::TrimError => "trim_error",
            Self::UnterminatedCString => "unterminated_c_string",
            Self::ZeroLengthCharacterString => "zero_length_character_string",
            Self::FloatingPointException => "floating_point_exception",
            Self::InvalidTextRepresentation => "invalid_text_representation",
            Self::InvalidBinaryRepresentation => "invalid_binary_representation",
            Self::BadCopyFileFormat => "bad_copy_file_format",
            Self::UntranslatableCharacter => "untranslatable_character",
            Self::NotAnXmlDocument => "not_an_xml_document",
            Self::InvalidXmlDocument => "invalid_xml_document",
            Self::InvalidXmlContent => "invalid_xml_content",
            Self::InvalidXmlComment => "invalid_xml_comment",
            Self::InvalidXmlProcessingInstruction => "invalid_xml_processing_instruction",
            Self::IntegrityConstraintViolation => "integrity_constraint_violation",
            Self::RestrictViolation => "restrict_violation",
            Self::NotNullViolation => "not_null_violation",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::UniqueViolation => "unique_violation",
            Self::CheckViolation => "check_violation",
            Self::ExclusionViolation => "exclusion_violation",
            Self::InvalidCursorState => "invalid_cursor_state",
            Self::InvalidTransactionState => "invalid_transaction_state",
            Self::ActiveSqlTransaction => "active_sql_transaction",
            Self::BranchTransactionAlreadyActive => "branch_transaction_already_active",
            Self::HeldCursorRequiresSameIsolationLevel => "held_cursor_requires_same_isolation_level",
            Self::InappropriateAccessModeForBranchTransaction => "inappropriate_access_mode_for_branch_transaction",
            Self::InappropriateIsolationLevelForBranchTransaction => "inappropriate_isolation_level_for_branch_transaction",
            Self::NoActiveSqlTransactionForBranchTransaction => "no_active_sql_transaction_for_branch_transaction",
            Self::ReadOnlySqlTransaction => "read_only_sql_transaction",
            Self::SchemaAndDataStatementMixingNotSupported => "schema_and_data_statement_mixing_not_supported",
            Self::NoActiveSqlTransaction => "no_active_sql_transaction",
            Self::InFailedSqlTransaction => "in_failed_sql_transaction",
            Self::InvalidSqlStatementName => "invalid_sql_statement_name",
            Self::TriggeredDataChangeViolation => "triggered_data_change_violation",
            Self::InvalidAuthorizationSpecification => "invalid_authorization_specification",
            Self::InvalidPassword => "invalid_password",
            Self::DependentPrivilegeDescriptorsStillExist => "dependent_privilege_descriptors_still_exist",
            Self::DependentObjectsStillExist => "dependent_objects_still_exist",
            Self::InvalidTransactionTermination => "invalid_transaction_termination",
            Self::SqlRoutineException => "sql_routine_exception",
            Self::FunctionExecutedNoReturnStatement => "function_executed_no_return_statement",
            Self::ModifyingSqlDataNotPermitted => "modifying_sql_data_not_permitted",
            Self::ProhibitedSqlStatementAttempted => "prohibited_sql_statement_attempted",
            Self::ReadingSqlDataNotPermitted => "reading_sql_data_not_permitted",
            Self::InvalidCursorName => "invalid_cursor_name",
            Self::ExternalRoutineException => "external_routine_exception",
            Self::ContainingSqlNotPermitted => "containing_sql_not_permitted",
            Self::ExternalRoutineInvocationException => "external_routine_invocation_exception",
            Self::InvalidSqlstateReturned => "invalid_sqlstate_returned",
            Self::TriggerProtocolViolated => "trigger_protocol_violated",
            Self::SrfProtocolViolated => "srf_protocol_violated",
            Self::SavepointException => "savepoint_exception",
            Self::InvalidSavepointSpecification => "invalid_savepoint_specification",
            Self::InvalidCatalogName => "invalid_catalog_name",
            Self::InvalidSchemaName => "invalid_schema_name",
            Self::TransactionRollback => "transaction_rollback",
            Self::TransactionIntegrityConstraintViolation => "transaction_integrity_constraint_violation",
            Self::SerializationFailure => "serialization_failure",
            Self::StatementCompletionUnknown => "statement_completion_unknown",
            Self::DeadlockDetected => "deadlock_detected",
            Self::SyntaxErrorOrAccessRuleViolation => "syntax_error_or_access_rule_violation",
            Self::SyntaxError => "syntax_error",
            Self::InsufficientPrivilege => "insufficient_privilege",
            Self::CannotCoerce => "cannot_coerce",
            Self::GroupingError => "grouping_error",
            Self::WindowingError => "windowing_error",
            Self::InvalidRecursion => "invalid_recursion",
            Self::InvalidForeignKey => "invalid_foreign_key",
            Self::InvalidName => "invalid_name",
            Self::NameTooLong => "name_too_long",
            Self::ReservedName => "reserved_name",
            Self::DatatypeMismatch => "datatype_mismatch",
            Self::IndeterminateDatatype => "indeterminate_datatype",
            Self::CollationMismatch => "collation_mismatch",
            Self::IndeterminateCollation => "indeterminate_collation",
            Self::WrongObjectType => "wrong_object_type",
            Self::UndefinedColumn => "undefined_column",
            Self::UndefinedFunction => "undefined_function",
            Self::UndefinedTable => "undefined_table",
            Self::UndefinedParameter => "undefined_parameter",
            Self::UndefinedObject => "undefined_object",
            Self::DuplicateColumn => "duplicate_column",
            Self::DuplicateCursor => "duplicate_cursor",
            Self::DuplicateDatabase => "duplicate_database",
            Self::DuplicateFunction => "duplicate_function",
            Self::DuplicatePreparedStatement => "duplicate_prepared_statement",
            Self::DuplicateSchema => "duplicate_schema",
            Self::DuplicateTable => "duplicate_table",
            Self::DuplicateAlias => "duplicate_alias",
            Self::DuplicateObject => "duplicate_object",
            Self::AmbiguousColumn => "ambiguous_column",
            Self::AmbiguousFunction => "ambiguous_function",
            Self::AmbiguousParameter => "ambiguous_parameter",
            Self::AmbiguousAlias => "ambiguous_alias",
            Self::InvalidColumnReference => "invalid_column_reference",
            Self::InvalidColumnDefinition => "invalid_column_definition",
            Self::InvalidCursorDefinition => "invalid_cursor_definition",
            Self::InvalidDatabaseDefinition => "invalid_database_definition",
            Self::InvalidFunctionDefinition => "invalid_function_definition",
            Self::InvalidPreparedStatementDefinition => "invalid_prepared_statement_definition",
            Self::InvalidSchemaDefinition => "invalid_schema_definition",
            Self::InvalidTableDefinition => "invalid_table_definition",
            Self::InvalidObjectDefinition => "invalid_object_definition",
            Self::WithCheckOptionViolation => "with_check_option_violation",
            Self::InsufficientResources => "insufficient_resources",
            Self::DiskFull => "disk_full",
            Self::OutOfMemory => "out_of_memory",
            Self::TooManyConnections => "too_many_connections",
            Self::ConfigurationLimitExceeded => "configuration_limit_exceeded",
            Self::ProgramLimitExceeded => "program_limit_exceeded",
            Self::StatementTooComplex => "statement_too_complex",
            Self::TooManyColumns => "too_many_columns",
            Self::TooManyArguments => "too_many_arguments",
            Self::ObjectNotInPrerequisiteState => "object_not_in_prerequisite_state",
            Self::ObjectInUse => "object_in_use",
            Self::CantChangeRuntimeParam => "cant_change_runtime_param",
            Self::LockNotAvailable => "lock_not_available",
            Self::OperatorIntervention => "operator_intervention",
            Self::QueryCanceled => "query_canceled",
            Self::AdminShutdown => "admin_shutdown",
            Self::CrashShutdown => "crash_shutdown",
            Self::CannotConnectNow => "cannot_connect_now",
            Self::DatabaseDropped => "database_dropped",
            Self::SystemError => "system_error",
            Self::IoError => "io_error",
            Self::UndefinedFile => "undefined_file",
            Self::DuplicateFile => "duplicate_file",
            Self::ConfigFileError => "config_file_error",
            Self::LockFileExists => "lock_file_exists",
            Self::FdwError => "fdw_error",
            Self::FdwColumnNameNotFound => "fdw_column_name_not_found",
            Self::FdwDynamicParameterValueNeeded => "fdw_dynamic_parameter_value_needed",
            Self::FdwFunctionSequenceError => "fdw_function_sequence_error",
            Self::FdwInconsistentDescriptorInformation => "fdw_inconsistent_descriptor_information",
            Self::FdwInvalidAttributeValue => "fdw_invalid_attribute_value",
            Self::FdwInvalidColumnName => "fdw_invalid_column_name",
            Self::FdwInvalidColumnNumber => "fdw_invalid_column_number",
            Self::FdwInvalidDataType => "fdw_invalid_data_type",
            Self::FdwInvalidDataTypeDescriptors => "fdw_invalid_data_type_descriptors",
            Self::FdwInvalidDescriptorFieldIdentifier => "fdw_invalid_descriptor_field_identifier",
            Self::FdwInvalidHandle => "fdw_invalid_handle",
            Self::FdwInvalidOptionIndex => "fdw_invalid_option_index",
            Self::FdwInvalidOptionName => "fdw_invalid_option_name",
            Self::FdwInvalidStringLengthOrBufferLength => "fdw_invalid_string_length_or_buffer_length",
            Self::FdwInvalidStringFormat => "fdw_invalid_string_format",
            Self::FdwInvalidUseOfNullPointer => "fdw_invalid_use_of_null_pointer",
            Self::FdwTooManyHandles => "fdw_too_many_handles",
            Self::FdwOutOfMemory => "fdw_out_of_memory",
            Self::FdwNoSchemas => "fdw_no_schemas",
            Self::FdwOptionNameNotFound => "fdw_option_name_not_found",
            Self::FdwReplyHandle => "fdw_reply_handle",
            Self::FdwSchemaNotFound => "fdw_schema_not_found",
            Self::FdwTableNotFound => "fdw_table_not_found",
            Self::FdwUnableToCreateExecution => "fdw_unable_to_create_execution",
            Self::FdwUnableToCreateReply => "fdw_unable_to_create_reply",
            Self::FdwUnableToEstablishConnection => "fdw_unable_to_establish_connection",
            Self::PlpgsqlError => "plpgsql_error",
            Self::RaiseException => "raise_exception",
            Self::NoDataFound => "no_data_found",
            Self::TooManyRows => "too_many_rows",
            Self::InternalError => "internal_error",
            Self::DataCorrupted => "data_corrupted",
            Self::IndexCorrupted => "index_corrupted",
            Self::Unknown => "unknown",
        }
    }

    /// The SQLSTATE this condition is primarily reported under.
    pub fn code(&self) -> Option<&'static str> {
        let code = match self {
            Self::SuccessfulCompletion => "00000",
            Self::Warning => "01000",
            Self::DynamicResultSetsReturned => "0100C",
            Self::ImplicitZeroBitPadding => "01008",
            Self::NullValueEliminatedInSetFunction => "01003",
            Self::PrivilegeNotGranted => "01007",
            Self::PrivilegeNotRevoked => "01006",
            Self::StringDataRightTruncation => "01004",
            Self::DeprecatedFeature => "01P01",
            Self::NoData => "02000",
            Self::NoAdditionalDynamicResultSetsReturned => "02001",
            Self::SqlStatementNotYetComplete => "03000",
            Self::ConnectionException => "08000",
            Self::ConnectionDoesNotExist => "08003",
            Self::ConnectionFailure => "08006",
            Self::SqlclientUnableToEstablishSqlconnection => "08001",
            Self::SqlserverRejectedEstablishmentOfSqlconnection => "08004",
            Self::TransactionResolutionUnknown => "08007",
            Self::ProtocolViolation => "08P01",
            Self::TriggeredActionException => "09000",
            Self::FeatureNotSupported => "0A000",
            Self::InvalidTransactionInitiation => "0B000",
            Self::LocatorException => "0F000",
            Self::InvalidLocatorSpecification => "0F001",
            Self::InvalidGrantor => "0L000",
            Self::InvalidGrantOperation => "0LP01",
            Self::InvalidRoleSpecification => "0P000",
            Self::DiagnosticsException => "0Z000",
            Self::StackedDiagnosticsAccessedWithoutActiveHandler => "0Z002",
            Self::CaseNotFound => "20000",
            Self::CardinalityViolation => "21000",
            Self::DataException => "22000",
            Self::ArraySubscriptError => "2202E",
            Self::CharacterNotInRepertoire => "22021",
            Self::DatetimeFieldOverflow => "22008",
            Self::DivisionByZero => "22012",
            Self::ErrorInAssignment => "22005",
            Self::EscapeCharacterConflict => "2200B",
            Self::IndicatorOverflow => "22022",
            Self::IntervalFieldOverflow => "22015",
            Self::InvalidArgumentForLogarithm => "2201E",
            Self::InvalidArgumentForNtileFunction => "22014",
            Self::InvalidArgumentForNthValueFunction => "22016",
            Self::InvalidArgumentForPowerFunction => "2201F",
            Self::InvalidArgumentForWidthBucketFunction => "2201G",
            Self::InvalidCharacterValueForCast => "22018",
            Self::InvalidDatetimeFormat => "22007",
            Self::InvalidEscapeCharacter => "22019",
            Self::InvalidEscapeOctet => "2200D",
            Self::InvalidEscapeSequence => "22025",
            Self::NonstandardUseOfEscapeCharacter => "22P06",
            Self::InvalidIndicatorParameterValue => "22010",
            Self::InvalidParameterValue => "22023",
            Self::InvalidRegularExpression => "2201B",
            Self::InvalidRowCountInLimitClause => "2201W",
            Self::InvalidRowCountInResultOffsetClause => "2201X",
            Self::InvalidTimeZoneDisplacementValue => "22009",
            Self::InvalidUseOfEscapeCharacter => "2200C",
            Self::MostSpecificTypeMismatch => "2200G",
            Self::NullValueNotAllowed => "22004",
            Self::NullValueNoIndicatorParameter => "22002",
            Self::NumericValueOutOfRange => "22003",
            Self::SequenceGeneratorLimitExceeded => "2200H",
            Self::StringDataLengthMismatch => "22026",
            Self::SubstringError => "22011",
            Self::TrimError => "22027",
            Self::UnterminatedCString => "22024",
            Self::ZeroLengthCharacterString => "2200F",
            Self::FloatingPointException => "22P01",
            Self::InvalidTextRepresentation => "22P02",
            Self::InvalidBinaryRepresentation => "22P03",
            Self::BadCopyFileFormat => "22P04",
            Self::UntranslatableCharacter => "22P05",
            Self::NotAnXmlDocument => "2200L",
            Self::InvalidXmlDocument => "2200M",
            Self::InvalidXmlContent => "2200N",
            Self::InvalidXmlComment => "2200S",
            Self::InvalidXmlProcessingInstruction => "2200T",
            Self::IntegrityConstraintViolation => "23000",
            Self::RestrictViolation => "23001",
            Self::NotNullViolation => "23502",
            Self::ForeignKeyViolation => "23503",
            Self::UniqueViolation => "23505",
            Self::CheckViolation => "23514",
            Self::ExclusionViolation => "23P01",
            Self::InvalidCursorState => "24000",
            Self::InvalidTransactionState => "25000",
            Self::ActiveSqlTransaction => "25001",
            Self::BranchTransactionAlreadyActive => "25002",
            Self::HeldCursorRequiresSameIsolationLevel => "25008",
            Self::InappropriateAccessModeForBranchTransaction => "25003",
            Self::InappropriateIsolationLevelForBranchTransaction => "25004",
            Self::NoActiveSqlTransactionForBranchTransaction => "25005",
            Self::ReadOnlySqlTransaction => "25006",
            Self::SchemaAndDataStatementMixingNotSupported => "25007",
            Self::NoActiveSqlTransaction => "25P01",
            Self::InFailedSqlTransaction => "25P02",
            Self::InvalidSqlStatementName => "26000",
            Self::TriggeredDataChangeViolation => "27000",
            Self::InvalidAuthorizationSpecification => "28000",
            Self::InvalidPassword => "28P01",
            Self::DependentPrivilegeDescriptorsStillExist => "2B000",
            Self::DependentObjectsStillExist => "2BP01",
            Self::InvalidTransactionTermination => "2D000",
            Self::SqlRoutineException => "2F000",
            Self::FunctionExecutedNoReturnStatement => "2F005",
            Self::ModifyingSqlDataNotPermitted => "2F002",
            Self::ProhibitedSqlStatementAttempted => "2F003",
            Self::ReadingSqlDataNotPermitted => "2F004",
            Self::InvalidCursorName => "34000",
            Self::ExternalRoutineException => "38000",
            Self::ContainingSqlNotPermitted => "38001",
            Self::ExternalRoutineInvocationException => "39000",
            Self::InvalidSqlstateReturned => "39001",
            Self::TriggerProtocolViolated => "39P01",
            Self::SrfProtocolViolated => "39P02",
            Self::SavepointException => "3B000",
            Self::InvalidSavepointSpecification => "3B001",
            Self::InvalidCatalogName => "3D000",
            Self::InvalidSchemaName => "3F000",
            Self::TransactionRollback => "40000",
            Self::TransactionIntegrityConstraintViolation => "40002",
            Self::SerializationFailure => "40001",
            Self::StatementCompletionUnknown => "40003",
            Self::DeadlockDetected => "40P01",
            Self::SyntaxErrorOrAccessRuleViolation => "42000",
            Self::SyntaxError => "42601",
            Self::InsufficientPrivilege => "42501",
            Self::CannotCoerce => "42846",
            Self::GroupingError => "42803",
            Self::WindowingError => "42P20",
            Self::InvalidRecursion => "42P19",
            Self::InvalidForeignKey => "42830",
            Self::InvalidName => "42602",
            Self::NameTooLong => "42622",
            Self::ReservedName => "42939",
            Self::DatatypeMismatch => "42804",
            Self::IndeterminateDatatype => "42P18",
            Self::CollationMismatch => "42P21",
            Self::IndeterminateCollation => "42P22",
            Self::WrongObjectType => "42809",
            Self::UndefinedColumn => "42703",
            Self::UndefinedFunction => "42883",
            Self::UndefinedTable => "42P01",
            Self::UndefinedParameter => "42P02",
            Self::UndefinedObject => "42704",
            Self::DuplicateColumn => "42701",
            Self::DuplicateCursor => "42P03",
            Self::DuplicateDatabase => "42P04",
            Self::DuplicateFunction => "42723",
            Self::DuplicatePreparedStatement => "42P05",
            Self::DuplicateSchema => "42P06",
            Self::DuplicateTable => "42P07",
            Self::DuplicateAlias => "42712",
            Self::DuplicateObject => "42710",
            Self::AmbiguousColumn => "42702",
            Self::AmbiguousFunction => "42725",
            Self::AmbiguousParameter => "42P08",
            Self::AmbiguousAlias => "42P09",
            Self::InvalidColumnReference => "42P10",
            Self::InvalidColumnDefinition => "42611",
            Self::InvalidCursorDefinition => "42P11",
            Self::InvalidDatabaseDefinition => "42P12",
            Self::InvalidFunctionDefinition => "42P13",
            Self::InvalidPreparedStatementDefinition => "42P14",
            Self::InvalidSchemaDefinition => "42P15",
            Self::InvalidTableDefinition => "42P16",
            Self::InvalidObjectDefinition => "42P17",
            Self::WithCheckOptionViolation => "44000",
            Self::InsufficientResources => "53000",
            Self::DiskFull => "53100",
            Self::OutOfMemory => "53200",
            Self::TooManyConnections => "53300",
            Self::ConfigurationLimitExceeded => "53400",
            Self::ProgramLimitExceeded => "54000",
            Self::StatementTooComplex => "54001",
            Self::TooManyColumns => "54011",
            Self::TooManyArguments => "54023",
            Self::ObjectNotInPrerequisiteState => "55000",
            Self::ObjectInUse => "55006",
            Self::CantChangeRuntimeParam => "55P02",
            Self::LockNotAvailable => "55P03",
            Self::OperatorIntervention => "57000",
            Self::QueryCanceled => "57014",
            Self::AdminShutdown => "57P01",
            Self::CrashShutdown => "57P02",
            Self::CannotConnectNow => "57P03",
            Self::DatabaseDropped => "57P04",
            Self::SystemError => "58000",
            Self::IoError => "58030",
            Self::UndefinedFile => "58P01",
            Self::DuplicateFile => "58P02",
            Self::ConfigFileError => "F0000",
            Self::LockFileExists => "F0001",
            Self::FdwError => "HV000",
            Self::FdwColumnNameNotFound => "HV005",
            Self::FdwDynamicParameterValueNeeded => "HV002",
            Self::FdwFunctionSequenceError => "HV010",
            Self::FdwInconsistentDescriptorInformation => "HV021",
            Self::FdwInvalidAttributeValue => "HV024",
            Self::FdwInvalidColumnName => "HV007",
            Self::FdwInvalidColumnNumber => "HV008",
            Self::FdwInvalidDataType => "HV004",
            Self::FdwInvalidDataTypeDescriptors => "HV006",
            Self::FdwInvalidDescriptorFieldIdentifier => "HV091",
            Self::FdwInvalidHandle => "HV00B",
            Self::FdwInvalidOptionIndex => "HV00C",
            Self::FdwInvalidOptionName => "HV00D",
            Self::FdwInvalidStringLengthOrBufferLength => "HV090",
            Self::FdwInvalidStringFormat => "HV00A",
            Self::FdwInvalidUseOfNullPointer => "HV009",
            Self::FdwTooManyHandles => "HV014",
            Self::FdwOutOfMemory => "HV001",
            Self::FdwNoSchemas => "HV00P",
            Self::FdwOptionNameNotFound => "HV00J",
            Self::FdwReplyHandle => "HV00K",
            Self::FdwSchemaNotFound => "HV00Q",
            Self::FdwTableNotFound => "HV00R",
            Self::FdwUnableToCreateExecution => "HV00L",
            Self::FdwUnableToCreateReply => "HV00M",
            Self::FdwUnableToEstablishConnection => "HV00N",
            Self::PlpgsqlError => "P0000",
            Self::RaiseException => "P0001",
            Self::NoDataFound => "P0002",
            Self::TooManyRows => "P0003",
            Self::InternalError => "XX000",
            Self::DataCorrupted => "XX001",
            Self::IndexCorrupted => "XX002",
            Self::Unknown => return None,
        };
        Some(code)
    }

    /// SQLSTATE class this condition belongs to.
    pub fn class(&self) -> PgErrorClass {
        self.code()
            .map(PgErrorClass::from_code)
            .unwrap_or(PgErrorClass::Other)
    }

    /// True for conditions of class 40, which a caller may retry as a whole transaction.
    pub fn is_transaction_rollback(&self) -> bool {
        self.class() == PgErrorClass::TransactionRollback
    }
}

impl fmt::Display for PgErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQLSTATE class, given by the first two characters of a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PgErrorClass {
    SuccessfulCompletion,
    Warning,
    NoData,
    SqlStatementNotYetComplete,
    ConnectionException,
    TriggeredActionException,
    FeatureNotSupported,
    InvalidTransactionInitiation,
    LocatorException,
    InvalidGrantor,
    InvalidRoleSpecification,
    DiagnosticsException,
    CaseNotFound,
    CardinalityViolation,
    DataException,
    IntegrityConstraintViolation,
    InvalidCursorState,
    InvalidTransactionState,
    InvalidSqlStatementName,
    TriggeredDataChangeViolation,
    InvalidAuthorizationSpecification,
    DependentPrivilegeDescriptorsStillExist,
    InvalidTransactionTermination,
    SqlRoutineException,
    InvalidCursorName,
    ExternalRoutineException,
    ExternalRoutineInvocationException,
    SavepointException,
    InvalidCatalogName,
    InvalidSchemaName,
    TransactionRollback,
    SyntaxErrorOrAccessRuleViolation,
    WithCheckOptionViolation,
    InsufficientResources,
    ProgramLimitExceeded,
    ObjectNotInPrerequisiteState,
    OperatorIntervention,
    SystemError,
    ConfigFileError,
    FdwError,
    PlpgsqlError,
    InternalError,
    /// Any class not listed in the manual.
    Other,
}

impl PgErrorClass {
    /// Class of a SQLSTATE code.
    pub fn from_code(code: &str) -> Self {
        match code.get(..2) {
            Some("00") => Self::SuccessfulCompletion,
            Some("01") => Self::Warning,
            Some("02") => Self::NoData,
            Some("03") => Self::SqlStatementNotYetComplete,
            Some("08") => Self::ConnectionException,
            Some("09") => Self::TriggeredActionException,
            Some("0A") => Self::FeatureNotSupported,
            Some("0B") => Self::InvalidTransactionInitiation,
            Some("0F") => Self::LocatorException,
            Some("0L") => Self::InvalidGrantor,
            Some("0P") => Self::InvalidRoleSpecification,
            Some("0Z") => Self::DiagnosticsException,
            Some("20") => Self::CaseNotFound,
            Some("21") => Self::CardinalityViolation,
            Some("22") => Self::DataException,
            Some("23") => Self::IntegrityConstraintViolation,
            Some("24") => Self::InvalidCursorState,
            Some("25") => Self::InvalidTransactionState,
            Some("26") => Self::InvalidSqlStatementName,
            Some("27") => Self::TriggeredDataChangeViolation,
            Some("28") => Self::InvalidAuthorizationSpecification,
            Some("2B") => Self::DependentPrivilegeDescriptorsStillExist,
            Some("2D") => Self::InvalidTransactionTermination,
            Some("2F") => Self::SqlRoutineException,
            Some("34") => Self::InvalidCursorName,
            Some("38") => Self::ExternalRoutineException,
            Some("39") => Self::ExternalRoutineInvocationException,
            Some("3B") => Self::SavepointException,
            Some("3D") => Self::InvalidCatalogName,
            Some("3F") => Self::InvalidSchemaName,
            Some("40") => Self::TransactionRollback,
            Some("42") => Self::SyntaxErrorOrAccessRuleViolation,
            Some("44") => Self::WithCheckOptionViolation,
            Some("53") => Self::InsufficientResources,
            Some("54") => Self::ProgramLimitExceeded,
            Some("55") => Self::ObjectNotInPrerequisiteState,
            Some("57") => Self::OperatorIntervention,
            Some("58") => Self::SystemError,
            Some("F0") => Self::ConfigFileError,
            Some("HV") => Self::FdwError,
            Some("P0") => Self::PlpgsqlError,
            Some("XX") => Self::InternalError,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuccessfulCompletion => "successful_completion",
            Self::Warning => "warning",
            Self::NoData => "no_data",
            Self::SqlStatementNotYetComplete => "sql_statement_not_yet_complete",
            Self::ConnectionException => "connection_exception",
            Self::TriggeredActionException => "triggered_action_exception",
            Self::FeatureNotSupported => "feature_not_supported",
            Self::InvalidTransactionInitiation => "invalid_transaction_initiation",
            Self::LocatorException => "locator_exception",
            Self::InvalidGrantor => "invalid_grantor",
            Self::InvalidRoleSpecification => "invalid_role_specification",
            Self::DiagnosticsException => "diagnostics_exception",
            Self::CaseNotFound => "case_not_found",
            Self::CardinalityViolation => "cardinality_violation",
            Self::DataException => "data_exception",
            Self::IntegrityConstraintViolation => "integrity_constraint_violation",
            Self::InvalidCursorState => "invalid_cursor_state",
            Self::InvalidTransactionState => "invalid_transaction_state",
            Self::InvalidSqlStatementName => "invalid_sql_statement_name",
            Self::TriggeredDataChangeViolation => "triggered_data_change_violation",
            Self::InvalidAuthorizationSpecification => "invalid_authorization_specification",
            Self::DependentPrivilegeDescriptorsStillExist => "dependent_privilege_descriptors_still_exist",
            Self::InvalidTransactionTermination => "invalid_transaction_termination",
            Self::SqlRoutineException => "sql_routine_exception",
            Self::InvalidCursorName => "invalid_cursor_name",
            Self::ExternalRoutineException => "external_routine_exception",
            Self::ExternalRoutineInvocationException => "external_routine_invocation_exception",
            Self::SavepointException => "savepoint_exception",
            Self::InvalidCatalogName => "invalid_catalog_name",
            Self::InvalidSchemaName => "invalid_schema_name",
            Self::TransactionRollback => "transaction_rollback",
            Self::SyntaxErrorOrAccessRuleViolation => "syntax_error_or_access_rule_violation",
            Self::WithCheckOptionViolation => "with_check_option_violation",
            Self::InsufficientResources => "insufficient_resources",
            Self::ProgramLimitExceeded => "program_limit_exceeded",
            Self::ObjectNotInPrerequisiteState => "object_not_in_prerequisite_state",
            Self::OperatorIntervention => "operator_intervention",
            Self::SystemError => "system_error",
            Self::ConfigFileError => "config_file_error",
            Self::FdwError => "fdw_error",
            Self::PlpgsqlError => "plpgsql_error",
            Self::InternalError => "internal_error",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for PgErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
