//! Accessor tables for the host objects seen across host versions.
//!
//! Older hosts expose public fields (`pid`, `processName`, `info`), newer
//! ones hide them behind getters or `m`-prefixed fields. Each table lists the
//! known spellings, most common first.

use super::strategy::{Attribute, Step, Strategy};

/// Process record recovered from the dialog result data.
pub static PROCESS_RECORD: Attribute = Attribute {
    name: "process_record",
    strategies: &[
        Strategy {
            name: "proc",
            path: &[Step::Field("proc")],
        },
        Strategy {
            name: "app",
            path: &[Step::Field("app")],
        },
        Strategy {
            name: "getProcessRecord()",
            path: &[Step::Method("getProcessRecord")],
        },
    ],
};

/// Process id on the process record.
pub static PID: Attribute = Attribute {
    name: "pid",
    strategies: &[
        Strategy {
            name: "pid",
            path: &[Step::Field("pid")],
        },
        Strategy {
            name: "getPid()",
            path: &[Step::Method("getPid")],
        },
        Strategy {
            name: "mPid",
            path: &[Step::Field("mPid")],
        },
    ],
};

/// User id on the process record.
pub static USER_ID: Attribute = Attribute {
    name: "user_id",
    strategies: &[
        Strategy {
            name: "userId",
            path: &[Step::Field("userId")],
        },
        Strategy {
            name: "getUserId()",
            path: &[Step::Method("getUserId")],
        },
        Strategy {
            name: "mUserId",
            path: &[Step::Field("mUserId")],
        },
    ],
};

/// Process name on the process record.
pub static PROCESS_NAME: Attribute = Attribute {
    name: "process_name",
    strategies: &[
        Strategy {
            name: "processName",
            path: &[Step::Field("processName")],
        },
        Strategy {
            name: "getProcessName()",
            path: &[Step::Method("getProcessName")],
        },
        Strategy {
            name: "mProcessName",
            path: &[Step::Field("mProcessName")],
        },
    ],
};

/// Application-info attachment on the process record.
pub static APP_INFO: Attribute = Attribute {
    name: "app_info",
    strategies: &[
        Strategy {
            name: "info",
            path: &[Step::Field("info")],
        },
        Strategy {
            name: "getApplicationInfo()",
            path: &[Step::Method("getApplicationInfo")],
        },
        Strategy {
            name: "mInfo",
            path: &[Step::Field("mInfo")],
        },
    ],
};

/// Package name on the application info.
pub static PACKAGE_NAME: Attribute = Attribute {
    name: "package_name",
    strategies: &[
        Strategy {
            name: "packageName",
            path: &[Step::Field("packageName")],
        },
        Strategy {
            name: "getPackageName()",
            path: &[Step::Method("getPackageName")],
        },
    ],
};

/// Packages loaded into the process.
pub static PACKAGE_LIST: Attribute = Attribute {
    name: "package_list",
    strategies: &[
        Strategy {
            name: "pkgList",
            path: &[Step::Field("pkgList")],
        },
        Strategy {
            name: "getPackageList()",
            path: &[Step::Method("getPackageList")],
        },
        Strategy {
            name: "mPkgList.size()",
            path: &[Step::Field("mPkgList"), Step::Method("size")],
        },
    ],
};

/// Repeated-crash flag, on the result data or the process record.
pub static REPEATING: Attribute = Attribute {
    name: "repeating",
    strategies: &[
        Strategy {
            name: "repeating",
            path: &[Step::Field("repeating")],
        },
        Strategy {
            name: "isRepeating()",
            path: &[Step::Method("isRepeating")],
        },
        Strategy {
            name: "mRepeating",
            path: &[Step::Field("mRepeating")],
        },
    ],
};

/// Owning service, on the process record or the errors controller.
pub static SERVICE: Attribute = Attribute {
    name: "service",
    strategies: &[
        Strategy {
            name: "mService",
            path: &[Step::Field("mService")],
        },
        Strategy {
            name: "getService()",
            path: &[Step::Method("getService")],
        },
        Strategy {
            name: "mAtmInternal",
            path: &[Step::Field("mAtmInternal")],
        },
    ],
};

/// User controller on the owning service.
pub static USER_CONTROLLER: Attribute = Attribute {
    name: "user_controller",
    strategies: &[
        Strategy {
            name: "mUserController",
            path: &[Step::Field("mUserController")],
        },
        Strategy {
            name: "getUserController()",
            path: &[Step::Method("getUserController")],
        },
    ],
};

/// Active foreground profile ids on the user controller.
pub static PROFILE_IDS: Attribute = Attribute {
    name: "profile_ids",
    strategies: &[
        Strategy {
            name: "getCurrentProfileIds()",
            path: &[Step::Method("getCurrentProfileIds")],
        },
        Strategy {
            name: "mCurrentProfileIds",
            path: &[Step::Field("mCurrentProfileIds")],
        },
    ],
};

/// Exception class on the crash info.
pub static EXCEPTION_CLASS: Attribute = Attribute {
    name: "exception_class",
    strategies: &[Strategy {
        name: "exceptionClassName",
        path: &[Step::Field("exceptionClassName")],
    }],
};

/// Exception message on the crash info.
pub static EXCEPTION_MESSAGE: Attribute = Attribute {
    name: "exception_message",
    strategies: &[Strategy {
        name: "exceptionMessage",
        path: &[Step::Field("exceptionMessage")],
    }],
};

/// Throw site file on the crash info.
pub static THROW_FILE: Attribute = Attribute {
    name: "throw_file",
    strategies: &[Strategy {
        name: "throwFileName",
        path: &[Step::Field("throwFileName")],
    }],
};

/// Throw site line on the crash info.
pub static THROW_LINE: Attribute = Attribute {
    name: "throw_line",
    strategies: &[Strategy {
        name: "throwLineNumber",
        path: &[Step::Field("throwLineNumber")],
    }],
};

/// Stack trace on the crash info.
pub static STACK_TRACE: Attribute = Attribute {
    name: "stack_trace",
    strategies: &[Strategy {
        name: "stackTrace",
        path: &[Step::Field("stackTrace")],
    }],
};
