//! Starter files written into every new workspace.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarterFile {
    /// Path relative to the workspace folder.
    pub name: String,
    pub content: String,
}

impl StarterFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

const STORAGE: &str = r#"// SPDX-License-Identifier: GPL-3.0
pragma solidity >=0.7.0 <0.9.0;

contract Storage {
    uint256 number;

    function store(uint256 num) public {
        number = num;
    }

    function retrieve() public view returns (uint256) {
        return number;
    }
}
"#;

const OWNER: &str = r#"// SPDX-License-Identifier: GPL-3.0
pragma solidity >=0.7.0 <0.9.0;

contract Owner {
    address private owner;

    constructor() {
        owner = msg.sender;
    }

    function getOwner() external view returns (address) {
        return owner;
    }
}
"#;

const DEPLOY: &str = r#"// Deploys Storage with the injected provider.
(async () => {
  const artifact = JSON.parse(await readFile('artifacts/Storage.json'))
  console.log('deploying', artifact.contractName)
})()
"#;

const STORAGE_TEST: &str = r#"describe('Storage', () => {
  it('stores and retrieves a number', async () => {
    const storage = await deploy('Storage')
    await storage.store(56)
    expect(await storage.retrieve()).to.equal(56)
  })
})
"#;

const README: &str = "Default workspace.\n\n\
contracts/  example contracts\n\
scripts/    deployment scripts\n\
tests/      contract tests\n";

pub fn starter_files() -> Vec<StarterFile> {
    vec![
        StarterFile::new("contracts/1_Storage.sol", STORAGE),
        StarterFile::new("contracts/2_Owner.sol", OWNER),
        StarterFile::new("scripts/deploy.js", DEPLOY),
        StarterFile::new("tests/storage.test.js", STORAGE_TEST),
        StarterFile::new("README.txt", README),
    ]
}
